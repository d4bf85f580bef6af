/*!
 * Process Syscall Handler
 * Handles exec and wait
 */

use crate::syscalls::handler::{SyscallContext, SyscallHandler};
use crate::syscalls::types::{Completion, Syscall, SyscallResult};

/// Handler for process management syscalls
pub struct ProcessHandler;

impl SyscallHandler for ProcessHandler {
    #[inline]
    fn handle(&self, ctx: &SyscallContext<'_>, syscall: &Syscall) -> Option<SyscallResult<Completion>> {
        match syscall {
            Syscall::Exec { cmd_line } => Some(ctx.executor.exec(ctx.process, *cmd_line)),
            Syscall::Wait { pid } => Some(ctx.executor.wait(ctx.process, *pid)),
            _ => None, // Not a process syscall
        }
    }

    #[inline]
    fn name(&self) -> &'static str {
        "process_handler"
    }
}
