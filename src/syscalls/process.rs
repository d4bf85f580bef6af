/*!
 * Process Syscalls
 * Exec and wait
 */

use super::executor::SyscallExecutor;
use super::types::{Completion, SyscallError, SyscallResult};
use crate::core::types::Pid;
use crate::memory::{MemoryError, UserPtr};
use crate::process::Process;
use std::sync::Arc;
use tracing::debug;

impl SyscallExecutor {
    /// Spawn a child and block until it reports whether it loaded
    pub(super) fn exec(&self, process: &Arc<Process>, cmd_line: UserPtr) -> SyscallResult<Completion> {
        if cmd_line.is_null() {
            return Err(SyscallError::BadAddress(MemoryError::BadAddress(0)));
        }
        let command = self.user_string(process, cmd_line)?;

        let pid = self.lifecycle.exec(self, process, &command)?;
        debug!(parent = process.pid(), pid, command = %command, "exec");
        Ok(Completion::Return(pid))
    }

    /// Block until direct child `pid` exits and return its status
    pub(super) fn wait(&self, process: &Process, pid: Pid) -> SyscallResult<Completion> {
        if process.relationship().find_child(pid).is_none() {
            return Err(SyscallError::NotAChild(pid));
        }
        Ok(Completion::Return(self.lifecycle.wait(process, pid)))
    }
}
