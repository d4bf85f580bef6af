/*!
 * File Descriptor Syscall Handler
 * Handles file descriptor operations
 */

use crate::syscalls::handler::{SyscallContext, SyscallHandler};
use crate::syscalls::types::{Completion, Syscall, SyscallResult};

/// Handler for file descriptor syscalls
pub struct FileDescriptorHandler;

impl SyscallHandler for FileDescriptorHandler {
    #[inline]
    fn handle(&self, ctx: &SyscallContext<'_>, syscall: &Syscall) -> Option<SyscallResult<Completion>> {
        let executor = ctx.executor;
        let process = ctx.process;
        match *syscall {
            Syscall::Filesize { fd } => Some(executor.filesize(process, fd)),
            Syscall::Read { fd, buffer, size } => Some(executor.read(process, fd, buffer, size)),
            Syscall::Write { fd, buffer, size } => Some(executor.write(process, fd, buffer, size)),
            Syscall::Seek { fd, position } => Some(executor.seek(process, fd, position)),
            Syscall::Tell { fd } => Some(executor.tell(process, fd)),
            Syscall::Close { fd } => Some(executor.close(process, fd)),
            _ => None, // Not an fd syscall
        }
    }

    #[inline]
    fn name(&self) -> &'static str {
        "fd_handler"
    }
}
