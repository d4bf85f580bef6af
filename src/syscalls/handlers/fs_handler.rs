/*!
 * File System Syscall Handler
 * Handles name-based file operations
 */

use crate::syscalls::handler::{SyscallContext, SyscallHandler};
use crate::syscalls::types::{Completion, Syscall, SyscallResult};

/// Handler for filesystem syscalls
pub struct FileSystemHandler;

impl SyscallHandler for FileSystemHandler {
    #[inline]
    fn handle(&self, ctx: &SyscallContext<'_>, syscall: &Syscall) -> Option<SyscallResult<Completion>> {
        match syscall {
            Syscall::Create { name, initial_size } => {
                Some(ctx.executor.create(ctx.process, *name, *initial_size))
            }
            Syscall::Remove { name } => Some(ctx.executor.remove(ctx.process, *name)),
            Syscall::Open { name } => Some(ctx.executor.open(ctx.process, *name)),
            _ => None, // Not a filesystem syscall
        }
    }

    #[inline]
    fn name(&self) -> &'static str {
        "fs_handler"
    }
}
