/*!
 * System Syscalls
 * Power-off and voluntary exit
 */

use super::executor::SyscallExecutor;
use super::types::{Completion, SyscallResult};
use crate::core::limits::EXIT_FAILURE;
use crate::core::types::ExitStatus;
use tracing::info;

impl SyscallExecutor {
    pub(super) fn halt(&self) -> SyscallResult<Completion> {
        info!("halt requested");
        self.power.power_off();
        Ok(Completion::Halt)
    }

    /// Statuses below -1 are reserved for the kernel and coerced to -1
    pub(super) fn exit(&self, status: ExitStatus) -> SyscallResult<Completion> {
        Ok(Completion::Exit(status.max(EXIT_FAILURE)))
    }
}
