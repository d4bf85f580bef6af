/*!
 * Process Traits
 * Seam between the syscall layer and whatever actually runs user programs
 */

use super::types::{Process, SpawnError};
use crate::memory::AddressSpace;
use crate::syscalls::SyscallExecutor;
use std::sync::Arc;

/// Starts user programs on behalf of exec
///
/// `start` must arrange for the child to eventually call
/// `SyscallExecutor::complete_load` exactly once with whether its program
/// image loaded. Returning an error means the child never ran and will
/// never report.
pub trait ProcessLoader: Send + Sync {
    /// Fresh address space for a new process
    fn new_address_space(&self) -> Arc<dyn AddressSpace>;

    /// Begin running `command_line` as `child`
    fn start(
        &self,
        executor: SyscallExecutor,
        child: Arc<Process>,
        command_line: String,
    ) -> Result<(), SpawnError>;
}
