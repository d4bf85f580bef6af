/*!
 * System Syscall Handler
 * Handles halt and exit
 */

use crate::syscalls::handler::{SyscallContext, SyscallHandler};
use crate::syscalls::types::{Completion, Syscall, SyscallResult};

/// Handler for system control syscalls
pub struct SystemHandler;

impl SyscallHandler for SystemHandler {
    #[inline]
    fn handle(&self, ctx: &SyscallContext<'_>, syscall: &Syscall) -> Option<SyscallResult<Completion>> {
        match syscall {
            Syscall::Halt => Some(ctx.executor.halt()),
            Syscall::Exit { status } => Some(ctx.executor.exit(*status)),
            _ => None, // Not a system syscall
        }
    }

    #[inline]
    fn name(&self) -> &'static str {
        "system_handler"
    }
}
