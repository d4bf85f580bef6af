/*!
 * Memory Types
 * User pointer wrapper and memory error types
 */

use crate::core::types::{Address, Word};
use std::fmt;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors raised while touching user memory
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    /// Null, kernel-range, or unmapped user address
    #[error("Invalid user address: 0x{0:x}")]
    BadAddress(Address),

    /// Page not present in the address space (kernel-side access)
    #[error("Page fault at 0x{0:x}")]
    Unmapped(Address),

    /// User string not terminated within the configured cap
    #[error("Unterminated user string at 0x{address:x} (cap {limit} bytes)")]
    Unterminated { address: Address, limit: usize },

    /// User string is not valid UTF-8
    #[error("Malformed user string at 0x{0:x}")]
    MalformedString(Address),
}

impl MemoryError {
    /// Whether this error means the process touched memory it may not use
    #[inline]
    pub const fn is_access_violation(&self) -> bool {
        matches!(self, MemoryError::BadAddress(_) | MemoryError::Unmapped(_))
    }
}

/// Untrusted address received from user mode
///
/// Carries no guarantee at all until run through the `PointerValidator`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UserPtr(Address);

impl UserPtr {
    pub const NULL: UserPtr = UserPtr(0);

    #[inline]
    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    /// Interpret a raw stack word as an address
    #[inline]
    pub const fn from_word(word: Word) -> Self {
        Self(word as Address)
    }

    #[inline]
    pub const fn addr(self) -> Address {
        self.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Pointer `offset` bytes further, or `None` on address overflow
    #[inline]
    pub fn checked_add(self, offset: usize) -> Option<UserPtr> {
        self.0.checked_add(offset).map(UserPtr)
    }
}

impl fmt::Debug for UserPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserPtr(0x{:x})", self.0)
    }
}

impl From<Address> for UserPtr {
    fn from(address: Address) -> Self {
        Self(address)
    }
}
