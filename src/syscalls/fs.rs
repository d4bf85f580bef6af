/*!
 * File System Syscalls
 * Create, remove and open by name
 *
 * Names are copied out of user memory before the filesystem lock is taken;
 * a bad name pointer never leaves the lock held.
 */

use super::executor::SyscallExecutor;
use super::types::{Completion, SyscallError, SyscallResult};
use crate::memory::UserPtr;
use crate::process::Process;
use tracing::{debug, trace};

impl SyscallExecutor {
    /// Copy a NUL-terminated name or command line out of user memory
    pub(super) fn user_string(&self, process: &Process, ptr: UserPtr) -> SyscallResult<String> {
        let s = self.validator.copy_in_string(
            ptr,
            self.config.max_string_len,
            process.address_space(),
        )?;
        Ok(s)
    }

    fn file_name(&self, process: &Process, ptr: UserPtr) -> SyscallResult<String> {
        let name = self.user_string(process, ptr)?;
        if name.is_empty() {
            return Err(SyscallError::InvalidArgument("empty file name".into()));
        }
        Ok(name)
    }

    pub(super) fn create(
        &self,
        process: &Process,
        name: UserPtr,
        initial_size: u32,
    ) -> SyscallResult<Completion> {
        let name = self.file_name(process, name)?;
        let created = self.filesys.lock().create(&name, u64::from(initial_size));
        trace!(pid = process.pid(), name = %name, initial_size, created, "create");
        Ok(Completion::from_bool(created))
    }

    pub(super) fn remove(&self, process: &Process, name: UserPtr) -> SyscallResult<Completion> {
        let name = self.file_name(process, name)?;
        let removed = self.filesys.lock().remove(&name);
        trace!(pid = process.pid(), name = %name, removed, "remove");
        Ok(Completion::from_bool(removed))
    }

    /// Open a named file and install it under a fresh handle
    ///
    /// A null name is an ordinary failure; any other bad pointer is fatal.
    pub(super) fn open(&self, process: &Process, name: UserPtr) -> SyscallResult<Completion> {
        if name.is_null() {
            return Err(SyscallError::InvalidArgument("null file name".into()));
        }
        let name = self.file_name(process, name)?;

        let fs = self.filesys.lock();
        let file = fs
            .open(&name)
            .ok_or_else(|| SyscallError::NotFound(name.clone()))?;
        let fd = process
            .files()
            .insert(file)
            .ok_or_else(|| SyscallError::InvalidArgument("handle space exhausted".into()))?;
        drop(fs);

        debug!(pid = process.pid(), name = %name, fd, "open");
        Ok(Completion::Return(fd))
    }
}
