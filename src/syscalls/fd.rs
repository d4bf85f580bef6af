/*!
 * File Descriptor Syscalls
 * Console streams and per-process open files
 *
 * Handles 0 and 1 are the console and never enter the descriptor table.
 * Buffers are validated over their whole extent before any byte moves.
 * Order for table access is filesystem lock first, then the table lock.
 */

use super::executor::SyscallExecutor;
use super::types::{Completion, SyscallError, SyscallResult};
use crate::core::limits::{CLOSE_ALL, STDIN_FILENO, STDOUT_FILENO};
use crate::core::types::Fd;
use crate::memory::UserPtr;
use crate::process::Process;
use crate::vfs::OpenFile;
use tracing::trace;

impl SyscallExecutor {
    /// Run `f` on open file `fd` with the filesystem lock held
    fn with_file<T>(
        &self,
        process: &Process,
        fd: Fd,
        f: impl FnOnce(&mut dyn OpenFile) -> T,
    ) -> SyscallResult<T> {
        let _fs = self.filesys.lock();
        let mut files = process.files();
        let file = files.get_mut(fd).ok_or(SyscallError::BadFd(fd))?;
        Ok(f(file))
    }

    pub(super) fn filesize(&self, process: &Process, fd: Fd) -> SyscallResult<Completion> {
        let length = self.with_file(process, fd, |file| file.length())?;
        Ok(Completion::from_count(length))
    }

    pub(super) fn read(
        &self,
        process: &Process,
        fd: Fd,
        buffer: UserPtr,
        size: u32,
    ) -> SyscallResult<Completion> {
        let space = process.address_space();
        let len = size as usize;
        self.validator.check_range(buffer, len, space)?;

        if fd == STDIN_FILENO {
            // One keystroke at a time, each stored as it arrives
            for offset in 0..len {
                let byte = self.console.getc();
                let dst = UserPtr::new(buffer.addr() + offset);
                self.validator.copy_out(dst, &[byte], space)?;
            }
            return Ok(Completion::from_count(size));
        }

        let mut data = vec![0u8; len];
        let count = self.with_file(process, fd, |file| file.read(&mut data))?;
        self.validator.copy_out(buffer, &data[..count], space)?;
        trace!(pid = process.pid(), fd, requested = size, count, "read");
        Ok(Completion::from_count(count))
    }

    pub(super) fn write(
        &self,
        process: &Process,
        fd: Fd,
        buffer: UserPtr,
        size: u32,
    ) -> SyscallResult<Completion> {
        let data = self
            .validator
            .copy_in(buffer, size as usize, process.address_space())?;

        if fd == STDOUT_FILENO {
            self.console.putbuf(&data);
            return Ok(Completion::from_count(size));
        }

        let count = self.with_file(process, fd, |file| file.write(&data))?;
        trace!(pid = process.pid(), fd, requested = size, count, "write");
        Ok(Completion::from_count(count))
    }

    pub(super) fn seek(&self, process: &Process, fd: Fd, position: u32) -> SyscallResult<Completion> {
        self.with_file(process, fd, |file| file.seek(u64::from(position)))?;
        Ok(Completion::Void)
    }

    pub(super) fn tell(&self, process: &Process, fd: Fd) -> SyscallResult<Completion> {
        let position = self.with_file(process, fd, |file| file.tell())?;
        Ok(Completion::from_count(position))
    }

    /// Close one handle, or every handle for `CLOSE_ALL`
    pub(super) fn close(&self, process: &Process, fd: Fd) -> SyscallResult<Completion> {
        let _fs = self.filesys.lock();
        let mut files = process.files();
        if fd == CLOSE_ALL {
            let closed = files.close_all();
            trace!(pid = process.pid(), closed, "close all");
        } else if !files.close(fd) {
            return Err(SyscallError::BadFd(fd));
        }
        Ok(Completion::Void)
    }
}
