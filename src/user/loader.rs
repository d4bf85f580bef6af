/*!
 * Thread-Backed Program Loader
 *
 * Runs each user process on its own named OS thread. Programs are Rust
 * closures registered by name; "loading" a command line means finding the
 * program named by its first token. The child reports its load result
 * before running, then exits with whatever the program returns. A program
 * that panics is a user fault and is killed with -1 like any other.
 */

use super::layout::map_user_image;
use super::process::{Trapped, UserProcess};
use crate::core::limits::EXIT_FAILURE;
use crate::memory::{AddressSpace, PageTable};
use crate::process::{program_name, Process, ProcessLoader, SpawnError};
use crate::syscalls::SyscallExecutor;
use dashmap::DashMap;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Entry point of a hosted user program; `args[0]` is the program name
pub type Program = Arc<dyn Fn(&UserProcess, &[String]) -> Result<i32, Trapped> + Send + Sync>;

/// Loader that maps programs by name to thread bodies
#[derive(Clone, Default)]
pub struct ThreadLoader {
    programs: Arc<DashMap<String, Program>>,
}

impl ThreadLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `name` loadable
    pub fn register<F>(&self, name: &str, program: F)
    where
        F: Fn(&UserProcess, &[String]) -> Result<i32, Trapped> + Send + Sync + 'static,
    {
        self.programs.insert(name.to_string(), Arc::new(program));
    }

    /// Builder-style `register`
    pub fn with_program<F>(self, name: &str, program: F) -> Self
    where
        F: Fn(&UserProcess, &[String]) -> Result<i32, Trapped> + Send + Sync + 'static,
    {
        self.register(name, program);
        self
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.programs.contains_key(name)
    }

    fn lookup(&self, command_line: &str) -> Option<Program> {
        let name = program_name(command_line)?;
        self.programs.get(name).map(|entry| entry.value().clone())
    }
}

impl ProcessLoader for ThreadLoader {
    fn new_address_space(&self) -> Arc<dyn AddressSpace> {
        let table = PageTable::new();
        map_user_image(&table);
        Arc::new(table)
    }

    fn start(
        &self,
        executor: SyscallExecutor,
        child: Arc<Process>,
        command_line: String,
    ) -> Result<(), SpawnError> {
        let loader = self.clone();
        let thread_name = format!("{}#{}", child.name(), child.pid());

        thread::Builder::new()
            .name(thread_name)
            .spawn(move || loader.run(executor, child, command_line))
            .map(|_| ())
            .map_err(|e| SpawnError::ThreadCreation(e.to_string()))
    }
}

impl ThreadLoader {
    /// Body of a user process thread
    fn run(&self, executor: SyscallExecutor, child: Arc<Process>, command_line: String) {
        let Some(program) = self.lookup(&command_line) else {
            debug!(pid = child.pid(), command = %command_line, "no such program");
            executor.complete_load(&child, false);
            executor.terminate(&child, EXIT_FAILURE);
            return;
        };

        executor.complete_load(&child, true);
        let args: Vec<String> = command_line.split_whitespace().map(String::from).collect();
        let user = UserProcess::attach(executor, child);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| program(&user, &args)));
        match outcome {
            Ok(Ok(status)) => {
                user.exit(status);
            }
            Ok(Err(Trapped::Exited(status))) => {
                debug!(pid = user.pid(), status, "program ended by trap");
            }
            Ok(Err(Trapped::Halted)) => {
                info!(pid = user.pid(), "program halted the machine");
            }
            Err(payload) => {
                warn!(
                    pid = user.pid(),
                    reason = panic_message(payload.as_ref()),
                    "program panicked"
                );
                user.executor().terminate(user.process(), EXIT_FAILURE);
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
