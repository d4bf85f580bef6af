/*!
 * Syscall Error Types
 * Error classification for syscall handlers
 */

use crate::core::types::{Fd, Pid};
use crate::memory::MemoryError;
use crate::process::SpawnError;
use thiserror::Error;

/// Syscall handler result
pub type SyscallResult<T> = Result<T, SyscallError>;

/// Syscall failures
///
/// `BadAddress` is the only fatal class: the caller is terminated with -1.
/// Everything else is reported through the syscall's failure sentinel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyscallError {
    /// User pointer failed validation
    #[error("Bad user address: {0}")]
    BadAddress(MemoryError),

    /// Handle not open in the calling process
    #[error("Unknown file descriptor: {0}")]
    BadFd(Fd),

    /// Named file does not exist or could not be created
    #[error("Not found: {0}")]
    NotFound(String),

    /// Argument well-formed as memory but unusable (e.g. empty name)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Child process could not be started or failed to load
    #[error("Spawn failed: {0}")]
    SpawnFailed(#[from] SpawnError),

    /// Pid is not an un-reaped child of the caller
    #[error("Not a child: {0}")]
    NotAChild(Pid),

    /// Number outside the syscall table
    #[error("Unknown syscall number: {0}")]
    UnknownSyscall(u32),
}

impl SyscallError {
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyscallError::BadAddress(_))
    }
}

impl From<MemoryError> for SyscallError {
    fn from(e: MemoryError) -> Self {
        if e.is_access_violation() {
            SyscallError::BadAddress(e)
        } else {
            SyscallError::InvalidArgument(e.to_string())
        }
    }
}
