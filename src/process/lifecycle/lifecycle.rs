/*!
 * Process Lifecycle
 *
 * Coordinates the three points where processes meet: exec (spawn a child
 * and block until its load result is known), wait (block until a direct
 * child exits and reap it), and exit (release resources and publish the
 * status).
 *
 * # Ordering
 *
 * Exit runs in a fixed sequence so observers see a consistent picture:
 *
 * 1. Close every open file under the filesystem lock
 * 2. Print the `name: exit(status)` record to the console
 * 3. Mark the process dead and post its exit signal
 * 4. Drop it from the process table
 *
 * A waiting parent therefore never returns before the exit record is out.
 */

use super::super::manager::ProcessManager;
use super::super::traits::ProcessLoader;
use super::super::types::{Process, SpawnError};
use crate::core::limits::EXIT_FAILURE;
use crate::core::types::{ExitStatus, Pid};
use crate::devices::Console;
use crate::syscalls::SyscallExecutor;
use crate::vfs::Filesys;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Exec/wait/exit coordinator
#[derive(Clone)]
pub struct Lifecycle {
    processes: ProcessManager,
    loader: Arc<dyn ProcessLoader>,
    console: Arc<dyn Console>,
    filesys: Filesys,
}

impl Lifecycle {
    pub fn new(
        processes: ProcessManager,
        loader: Arc<dyn ProcessLoader>,
        console: Arc<dyn Console>,
        filesys: Filesys,
    ) -> Self {
        Self {
            processes,
            loader,
            console,
            filesys,
        }
    }

    pub fn processes(&self) -> &ProcessManager {
        &self.processes
    }

    /// Start the first process, which has no parent
    pub fn spawn_init(
        &self,
        executor: &SyscallExecutor,
        command_line: &str,
    ) -> Result<Arc<Process>, SpawnError> {
        let name = program_name(command_line).ok_or(SpawnError::EmptyCommand)?;
        let process =
            self.processes
                .create_process(name, self.loader.new_address_space(), None);

        if let Err(e) = self
            .loader
            .start(executor.clone(), process.clone(), command_line.to_string())
        {
            self.processes.remove_process(process.pid());
            return Err(e);
        }
        info!(pid = process.pid(), name, "initial process started");
        Ok(process)
    }

    /// Spawn `command_line` as a child of `parent` and wait for its load
    ///
    /// On success the child's pid is returned and it stays in the parent's
    /// child list. On any failure the child is unlinked so it can never be
    /// waited on.
    pub fn exec(
        &self,
        executor: &SyscallExecutor,
        parent: &Arc<Process>,
        command_line: &str,
    ) -> Result<Pid, SpawnError> {
        let name = program_name(command_line).ok_or(SpawnError::EmptyCommand)?;
        let child = self.processes.create_process(
            name,
            self.loader.new_address_space(),
            Some(parent.as_ref()),
        );
        let pid = child.pid();

        if let Err(e) = self
            .loader
            .start(executor.clone(), child, command_line.to_string())
        {
            warn!(pid, error = %e, "child never started");
            parent.relationship().reap_child(pid);
            self.processes.remove_process(pid);
            return Err(e);
        }

        let loaded = parent
            .relationship()
            .find_child(pid)
            .and_then(|record| record.await_load())
            .unwrap_or(false);

        if loaded {
            debug!(parent = parent.pid(), pid, "exec succeeded");
            Ok(pid)
        } else {
            parent.relationship().reap_child(pid);
            Err(SpawnError::LoadFailed(name.to_string()))
        }
    }

    /// Child side of the load handshake
    pub fn complete_load(&self, child: &Process, success: bool) {
        if child.relationship().complete_load(success).is_posted() {
            debug!(pid = child.pid(), success, "load result posted");
        } else {
            warn!(pid = child.pid(), "load result reported twice");
        }
    }

    /// Block until direct child `pid` exits, then reap it
    ///
    /// Returns -1 if `pid` is not an un-reaped child of `parent`.
    pub fn wait(&self, parent: &Process, pid: Pid) -> ExitStatus {
        let Some(record) = parent.relationship().find_child(pid) else {
            debug!(parent = parent.pid(), pid, "wait on non-child");
            return EXIT_FAILURE;
        };

        let status = record.await_exit().unwrap_or(EXIT_FAILURE);
        parent.relationship().reap_child(pid);
        debug!(parent = parent.pid(), pid, status, "child reaped");
        status
    }

    /// Terminate `process` with `status`
    ///
    /// Idempotent: only the first call per process has any effect.
    pub fn exit(&self, process: &Process, status: ExitStatus) {
        if !process.begin_exit() {
            return;
        }

        let closed = {
            let _fs = self.filesys.lock();
            process.files().close_all()
        };

        let record = format!("{}: exit({})\n", process.name(), status);
        self.console.putbuf(record.as_bytes());
        info!(
            pid = process.pid(),
            name = process.name(),
            status,
            closed,
            "process exited"
        );

        let observed = process.relationship().record_exit(status);
        if !observed {
            debug!(pid = process.pid(), "no living parent to observe exit");
        }
        self.processes.remove_process(process.pid());
    }
}

/// First whitespace-separated token of a command line
pub fn program_name(command_line: &str) -> Option<&str> {
    command_line.split_whitespace().next()
}
