/*!
 * Process Lifecycle Tests
 * exec, wait and exit across real child threads
 */

use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Barrier};
use std::time::{Duration, Instant};
use trapgate_kernel::memory::AddressSpace;
use trapgate_kernel::process::ProcessState;
use trapgate_kernel::user::layout::map_user_image;
use trapgate_kernel::{
    BufferConsole, PageTable, Process, ProcessLoader, SpawnError, SyscallExecutor, ThreadLoader,
    UserProcess,
};

fn setup_test_env(loader: ThreadLoader) -> (Arc<BufferConsole>, SyscallExecutor, UserProcess) {
    let console = Arc::new(BufferConsole::new());
    let executor = SyscallExecutor::builder()
        .with_console(console.clone())
        .with_loader(Arc::new(loader))
        .build();
    let parent = UserProcess::boot(&executor, "parent");
    (console, executor, parent)
}

/// Poll until `console` has printed `needle`
fn wait_for_output(console: &BufferConsole, needle: &str) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if console.output_string().contains(needle) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    false
}

#[test]
fn test_exec_and_wait_returns_exit_status() {
    let loader = ThreadLoader::new().with_program("child", |_, _| Ok(42));
    let (console, executor, parent) = setup_test_env(loader);

    let pid = parent.exec("child").unwrap();
    assert!(pid > parent.pid());
    assert_eq!(parent.wait(pid).unwrap(), 42);

    // The record is out before wait returns
    assert!(console.output_string().contains("child: exit(42)\n"));
    assert!(executor.processes().get_process(pid).is_none());
}

#[test]
fn test_second_wait_returns_minus_one() {
    let loader = ThreadLoader::new().with_program("child", |_, _| Ok(3));
    let (_, _, parent) = setup_test_env(loader);

    let pid = parent.exec("child").unwrap();
    assert_eq!(parent.wait(pid).unwrap(), 3);
    assert_eq!(parent.wait(pid).unwrap(), -1);
}

#[test]
fn test_wait_on_non_child_returns_minus_one() {
    let (_, _, parent) = setup_test_env(ThreadLoader::new());
    assert_eq!(parent.wait(parent.pid()).unwrap(), -1);
    assert_eq!(parent.wait(999).unwrap(), -1);
    assert_eq!(parent.wait(-4).unwrap(), -1);
}

#[test]
fn test_wait_after_child_already_exited() {
    let loader = ThreadLoader::new().with_program("quick", |_, _| Ok(11));
    let (console, _, parent) = setup_test_env(loader);

    let pid = parent.exec("quick").unwrap();
    assert!(wait_for_output(&console, "quick: exit(11)\n"));
    assert_eq!(parent.wait(pid).unwrap(), 11);
}

#[test]
fn test_exec_passes_arguments() {
    let loader = ThreadLoader::new().with_program("args", |_, args| {
        let expected = ["args", "one", "two"];
        Ok(if args == expected { 0 } else { 1 })
    });
    let (_, _, parent) = setup_test_env(loader);

    let pid = parent.exec("  args  one two ").unwrap();
    assert_eq!(parent.wait(pid).unwrap(), 0);
}

#[test]
fn test_exec_missing_program_returns_minus_one() {
    let (console, executor, parent) = setup_test_env(ThreadLoader::new());

    assert_eq!(parent.exec("no-such --flag").unwrap(), -1);
    assert!(parent.process().relationship().child_pids().is_empty());
    assert!(wait_for_output(&console, "no-such: exit(-1)\n"));
    assert!(parent.process().is_alive());

    let deadline = Instant::now() + Duration::from_secs(2);
    while executor.processes().len() > 1 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(2));
    }
    assert_eq!(executor.processes().len(), 1);
}

#[test]
fn test_exec_empty_command_returns_minus_one() {
    let (console, executor, parent) = setup_test_env(ThreadLoader::new());
    assert_eq!(parent.exec("").unwrap(), -1);
    assert_eq!(parent.exec("   ").unwrap(), -1);
    assert_eq!(executor.processes().len(), 1);
    assert!(console.output().is_empty());
}

#[test]
fn test_child_can_use_the_console() {
    let loader = ThreadLoader::new().with_program("talker", |up, _| {
        up.write(1, b"hi from child\n")?;
        Ok(0)
    });
    let (console, _, parent) = setup_test_env(loader);

    let pid = parent.exec("talker").unwrap();
    parent.wait(pid).unwrap();
    assert_eq!(console.output_string(), "hi from child\ntalker: exit(0)\n");
}

#[test]
fn test_child_killed_by_bad_pointer() {
    let loader = ThreadLoader::new().with_program("crasher", |up, _| {
        up.syscall(trapgate_kernel::SyscallNumber::Create.into(), &[0, 0])?;
        Ok(0)
    });
    let (console, _, parent) = setup_test_env(loader);

    let pid = parent.exec("crasher").unwrap();
    assert_eq!(parent.wait(pid).unwrap(), -1);
    assert_eq!(console.output_string(), "crasher: exit(-1)\n");
}

#[test]
fn test_panicking_child_is_killed() {
    let gate = Arc::new(Barrier::new(2));
    let loader = {
        let gate = gate.clone();
        ThreadLoader::new().with_program("faulty", move |up, _| {
            up.create("scratch", 0)?;
            up.open("scratch")?;
            gate.wait();
            panic!("user fault");
        })
    };
    let (console, executor, parent) = setup_test_env(loader);

    let pid = parent.exec("faulty").unwrap();
    let child = executor.processes().get_process(pid).unwrap();
    gate.wait();
    assert_eq!(parent.wait(pid).unwrap(), -1);

    assert_eq!(console.output_string(), "faulty: exit(-1)\n");
    assert!(child.files().is_empty());
    assert!(executor.processes().get_process(pid).is_none());
    assert!(parent.process().is_alive());
}

#[test]
fn test_cannot_wait_on_grandchild() {
    let grandchild = Arc::new(AtomicI32::new(0));
    let loader = {
        let grandchild = grandchild.clone();
        ThreadLoader::new()
            .with_program("leaf", |_, _| Ok(1))
            .with_program("middle", move |up, _| {
                let pid = up.exec("leaf")?;
                grandchild.store(pid, Ordering::SeqCst);
                up.wait(pid)?;
                Ok(2)
            })
    };
    let (_, _, parent) = setup_test_env(loader);

    let middle = parent.exec("middle").unwrap();
    assert_eq!(parent.wait(middle).unwrap(), 2);

    let leaf = grandchild.load(Ordering::SeqCst);
    assert!(leaf > middle);
    assert_eq!(parent.wait(leaf).unwrap(), -1);
}

#[test]
fn test_orphan_still_records_status() {
    let gate = Arc::new(Barrier::new(2));
    let loader = {
        let gate = gate.clone();
        ThreadLoader::new().with_program("orphan", move |_, _| {
            gate.wait();
            Ok(9)
        })
    };
    let (console, _, parent) = setup_test_env(loader);

    let pid = parent.exec("orphan").unwrap();
    let record = parent.process().relationship().find_child(pid).unwrap();

    parent.exit(0);
    assert!(!parent.process().is_alive());
    gate.wait();

    assert_eq!(record.await_exit(), Some(9));
    assert!(!record.is_alive());
    assert!(wait_for_output(&console, "orphan: exit(9)\n"));
}

#[test]
fn test_concurrent_children() {
    let loader = ThreadLoader::new().with_program("worker", |up, args| {
        let n: i32 = args[1].parse().unwrap_or(-1);
        up.write(1, format!("worker {} up\n", n).as_bytes())?;
        Ok(n * 10)
    });
    let (console, _, parent) = setup_test_env(loader);

    let pids: Vec<i32> = (1..=4)
        .map(|n| parent.exec(&format!("worker {}", n)).unwrap())
        .collect();
    let mut sorted = pids.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 4);

    // Reap in reverse to show order does not matter
    for (n, pid) in pids.iter().enumerate().rev() {
        assert_eq!(parent.wait(*pid).unwrap(), (n as i32 + 1) * 10);
    }

    let output = console.output_string();
    assert_eq!(output.matches("worker: exit(").count(), 4);
}

#[test]
fn test_child_state_while_running() {
    let gate = Arc::new(Barrier::new(2));
    let loader = {
        let gate = gate.clone();
        ThreadLoader::new().with_program("sleeper", move |_, _| {
            gate.wait();
            Ok(0)
        })
    };
    let (_, executor, parent) = setup_test_env(loader);

    let pid = parent.exec("sleeper").unwrap();
    let child = executor.processes().get_process(pid).unwrap();
    assert_eq!(child.state(), ProcessState::Running);
    assert_eq!(child.relationship().parent_pid(), Some(parent.pid()));

    gate.wait();
    assert_eq!(parent.wait(pid).unwrap(), 0);
    assert_eq!(child.state(), ProcessState::Terminated);
}

struct BrokenLoader;

impl ProcessLoader for BrokenLoader {
    fn new_address_space(&self) -> Arc<dyn AddressSpace> {
        let table = PageTable::new();
        map_user_image(&table);
        Arc::new(table)
    }

    fn start(
        &self,
        _executor: SyscallExecutor,
        _child: Arc<Process>,
        _command_line: String,
    ) -> Result<(), SpawnError> {
        Err(SpawnError::ThreadCreation("out of threads".to_string()))
    }
}

#[test]
fn test_failed_thread_start_leaves_no_child() {
    let console = Arc::new(BufferConsole::new());
    let executor = SyscallExecutor::builder()
        .with_console(console.clone())
        .with_loader(Arc::new(BrokenLoader))
        .build();
    let parent = UserProcess::boot(&executor, "parent");

    assert_eq!(parent.exec("anything").unwrap(), -1);
    assert!(parent.process().relationship().child_pids().is_empty());
    assert_eq!(executor.processes().len(), 1);
    assert!(console.output().is_empty());
}

#[test]
fn test_spawn_init_runs_to_completion() {
    let console = Arc::new(BufferConsole::new());
    let loader = ThreadLoader::new().with_program("init", |up, _| {
        let pid = up.exec("init-child")?;
        up.wait(pid)
    });
    loader.register("init-child", |_, _| Ok(5));
    let executor = SyscallExecutor::builder()
        .with_console(console.clone())
        .with_loader(Arc::new(loader))
        .build();

    let init = executor.spawn_init("init").unwrap();
    assert_eq!(init.relationship().parent_pid(), None);
    assert_eq!(init.relationship().await_exit(), Some(5));
    assert_eq!(
        console.output_string(),
        "init-child: exit(5)\ninit: exit(5)\n"
    );
}

#[test]
fn test_spawn_init_rejects_empty_command() {
    let executor = SyscallExecutor::builder().build();
    assert_eq!(
        executor.spawn_init("  ").unwrap_err(),
        SpawnError::EmptyCommand
    );
    assert!(executor.processes().is_empty());
}
