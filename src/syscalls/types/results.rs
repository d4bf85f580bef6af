/*!
 * Syscall Result Types
 * What a handler hands back to the dispatcher
 */

use crate::core::types::ExitStatus;

/// Successful handler outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Write the value into the return slot and resume
    Return(i32),
    /// Resume without touching the return slot
    Void,
    /// Terminate the caller with this status
    Exit(ExitStatus),
    /// Power off; the caller never resumes
    Halt,
}

impl Completion {
    #[inline]
    pub fn from_bool(value: bool) -> Self {
        Completion::Return(i32::from(value))
    }

    /// Return value for a byte or offset count that must fit the 32-bit slot
    #[inline]
    pub fn from_count<T: TryInto<i32>>(count: T) -> Self {
        Completion::Return(count.try_into().unwrap_or(i32::MAX))
    }
}
