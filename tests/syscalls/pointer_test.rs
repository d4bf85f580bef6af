/*!
 * User Pointer Tests
 * Bad pointers terminate the caller; nothing reaches kernel memory
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use trapgate_kernel::core::limits::{PAGE_SIZE, PHYS_BASE};
use trapgate_kernel::user::layout::{USER_DATA_END, USER_STACK_BASE, USER_STACK_TOP};
use trapgate_kernel::{
    AddressSpace, BufferConsole, KernelConfig, SyscallExecutor, SyscallNumber, Trapped,
    UserProcess,
};

const UNMAPPED: u32 = 0x1000_0000;
const KERNEL: u32 = PHYS_BASE as u32;

fn setup_test_env() -> (Arc<BufferConsole>, UserProcess) {
    let console = Arc::new(BufferConsole::new());
    let executor = SyscallExecutor::builder()
        .with_console(console.clone())
        .build();
    let up = UserProcess::boot(&executor, "victim");
    (console, up)
}

fn assert_killed(console: &BufferConsole, up: &UserProcess, result: Result<u32, Trapped>) {
    assert_eq!(result, Err(Trapped::Exited(-1)));
    assert_eq!(up.process().exit_status(), Some(-1));
    assert_eq!(console.output_string(), "victim: exit(-1)\n");
}

#[test]
fn test_create_with_null_name_kills() {
    let (console, up) = setup_test_env();
    let result = up.syscall(SyscallNumber::Create.into(), &[0, 16]);
    assert_killed(&console, &up, result);
}

#[test]
fn test_create_with_unmapped_name_kills() {
    let (console, up) = setup_test_env();
    let result = up.syscall(SyscallNumber::Create.into(), &[UNMAPPED, 16]);
    assert_killed(&console, &up, result);
}

#[test]
fn test_remove_with_kernel_name_kills() {
    let (console, up) = setup_test_env();
    let result = up.syscall(SyscallNumber::Remove.into(), &[KERNEL]);
    assert_killed(&console, &up, result);
}

#[test]
fn test_exec_with_bad_pointer_kills() {
    for bad in [0, UNMAPPED, KERNEL] {
        let (console, up) = setup_test_env();
        let result = up.syscall(SyscallNumber::Exec.into(), &[bad]);
        assert_killed(&console, &up, result);
    }
}

#[test]
fn test_open_with_unmapped_name_kills() {
    let (console, up) = setup_test_env();
    let result = up.syscall(SyscallNumber::Open.into(), &[UNMAPPED]);
    assert_killed(&console, &up, result);
}

#[test]
fn test_open_with_null_name_fails_softly() {
    let (console, up) = setup_test_env();
    let result = up.syscall(SyscallNumber::Open.into(), &[0]);
    assert_eq!(result, Ok(u32::MAX));
    assert!(up.process().is_alive());
    assert!(console.output().is_empty());
}

#[test]
fn test_read_into_unmapped_buffer_kills() {
    let (console, up) = setup_test_env();
    up.create("f", 4).unwrap();
    let fd = up.open("f").unwrap();
    let result = up.syscall(SyscallNumber::Read.into(), &[fd as u32, UNMAPPED, 4]);
    assert_killed(&console, &up, result);
}

#[test]
fn test_stdin_read_into_kernel_buffer_kills() {
    let (console, up) = setup_test_env();
    let result = up.syscall(SyscallNumber::Read.into(), &[0, KERNEL, 4]);
    assert_killed(&console, &up, result);
}

#[test]
fn test_write_from_kernel_buffer_kills() {
    let (console, up) = setup_test_env();
    let result = up.syscall(SyscallNumber::Write.into(), &[1, KERNEL, 4]);
    assert_killed(&console, &up, result);
}

#[test]
fn test_buffer_running_off_mapping_kills() {
    let (console, up) = setup_test_env();
    let start = (USER_DATA_END - 8) as u32;
    let result = up.syscall(SyscallNumber::Write.into(), &[1, start, 16]);
    assert_killed(&console, &up, result);
}

#[test]
fn test_buffer_at_end_of_mapping_is_fine() {
    let (console, up) = setup_test_env();
    let start = (USER_DATA_END - 8) as u32;
    let result = up.syscall(SyscallNumber::Write.into(), &[1, start, 8]);
    assert_eq!(result, Ok(8));
    assert_eq!(console.output(), vec![0u8; 8]);
}

#[test]
fn test_bad_stack_pointer_kills() {
    for esp in [0, UNMAPPED as usize, PHYS_BASE, PHYS_BASE + PAGE_SIZE] {
        let (console, up) = setup_test_env();
        let result = up.syscall_at(esp);
        assert_killed(&console, &up, result);
    }
}

#[test]
fn test_argument_slots_past_stack_top_kill() {
    let (console, up) = setup_test_env();
    let esp = USER_STACK_TOP - 4;
    let number: u32 = SyscallNumber::Read.into();
    up.process()
        .address_space()
        .write(esp, &number.to_le_bytes())
        .unwrap();

    let result = up.syscall_at(esp);
    assert_killed(&console, &up, result);
}

#[test]
fn test_exit_argument_past_stack_top() {
    let (console, up) = setup_test_env();
    let esp = USER_STACK_TOP - 4;
    let number: u32 = SyscallNumber::Exit.into();
    up.process()
        .address_space()
        .write(esp, &number.to_le_bytes())
        .unwrap();

    // exit takes one argument, which would sit at the ceiling
    let result = up.syscall_at(esp);
    assert_killed(&console, &up, result);
}

#[test]
fn test_stack_pointer_at_bottom_of_stack() {
    let (_, up) = setup_test_env();
    let esp = USER_STACK_BASE;
    let words: Vec<u8> = [SyscallNumber::Tell as u32, 2]
        .iter()
        .flat_map(|w| w.to_le_bytes())
        .collect();
    up.process().address_space().write(esp, &words).unwrap();

    assert_eq!(up.syscall_at(esp), Ok(u32::MAX));
}

#[test]
fn test_overlong_name_is_rejected_not_fatal() {
    let executor = SyscallExecutor::builder()
        .with_config(KernelConfig::default().with_max_string_len(16))
        .build();
    let up = UserProcess::boot(&executor, "longname");

    let name = "x".repeat(64);
    assert_eq!(up.create(&name, 0), Ok(false));
    assert_eq!(up.open(&name), Ok(-1));
    assert!(up.process().is_alive());
}

#[test]
fn test_dead_process_gets_nothing_back() {
    let (console, up) = setup_test_env();
    let result = up.syscall(SyscallNumber::Exec.into(), &[0]);
    assert_killed(&console, &up, result);

    // Further traps report the recorded status and print nothing new
    assert_eq!(up.write(1, b"ghost"), Err(Trapped::Exited(-1)));
    assert_eq!(console.output_string(), "victim: exit(-1)\n");
}
