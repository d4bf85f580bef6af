/*!
 * User Pointer Validation
 *
 * The only gate between untrusted user addresses and kernel accesses.
 * An address is safe when it is non-null, below the user ceiling, and backed
 * by a present user page in the caller's address space. Validation consults
 * mapping metadata only; nothing is dereferenced to find out.
 *
 * Every copy helper validates before it touches memory, so a bad pointer
 * surfaces as `MemoryError::BadAddress` and never as a kernel fault.
 */

use super::traits::AddressSpace;
use super::types::{MemoryError, MemoryResult, UserPtr};
use crate::core::limits::{PAGE_SIZE, PHYS_BASE, WORD_SIZE};
use crate::core::types::{Address, Word};

/// Validate `addr` against the default user ceiling
#[inline]
pub fn is_safe(addr: Address, space: &dyn AddressSpace) -> bool {
    PointerValidator::default().is_safe(addr, space)
}

/// Pointer validator bound to a user address ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerValidator {
    user_limit: Address,
}

impl Default for PointerValidator {
    fn default() -> Self {
        Self::new(PHYS_BASE)
    }
}

impl PointerValidator {
    pub const fn new(user_limit: Address) -> Self {
        Self { user_limit }
    }

    #[inline]
    pub const fn user_limit(&self) -> Address {
        self.user_limit
    }

    /// Is `addr` a dereferenceable user address
    #[inline]
    pub fn is_safe(&self, addr: Address, space: &dyn AddressSpace) -> bool {
        addr != 0 && addr < self.user_limit && space.is_user_mapped(addr)
    }

    /// Is every byte of `[addr, addr + len)` safe
    ///
    /// A zero-length range still requires a safe base address.
    pub fn is_safe_range(&self, addr: Address, len: usize, space: &dyn AddressSpace) -> bool {
        if !self.is_safe(addr, space) {
            return false;
        }
        if len <= 1 {
            return true;
        }
        let Some(last) = addr.checked_add(len - 1) else {
            return false;
        };
        if last >= self.user_limit {
            return false;
        }

        // Base page already checked; check the start of each later page.
        // A page start past usize::MAX means the range ends in the last page.
        let mut next = (addr / PAGE_SIZE + 1).checked_mul(PAGE_SIZE);
        while let Some(page) = next.filter(|page| *page <= last) {
            if !space.is_user_mapped(page) {
                return false;
            }
            next = page.checked_add(PAGE_SIZE);
        }
        true
    }

    /// Fail with `BadAddress` unless the whole range is safe
    #[inline]
    pub fn check_range(
        &self,
        ptr: UserPtr,
        len: usize,
        space: &dyn AddressSpace,
    ) -> MemoryResult<()> {
        if self.is_safe_range(ptr.addr(), len, space) {
            Ok(())
        } else {
            Err(MemoryError::BadAddress(ptr.addr()))
        }
    }

    /// Read one little-endian word at `addr`
    pub fn read_word(&self, addr: Address, space: &dyn AddressSpace) -> MemoryResult<Word> {
        let mut raw = [0u8; WORD_SIZE];
        self.copy_in_into(UserPtr::new(addr), &mut raw, space)?;
        Ok(Word::from_le_bytes(raw))
    }

    /// Copy `len` user bytes into a kernel buffer
    pub fn copy_in(
        &self,
        ptr: UserPtr,
        len: usize,
        space: &dyn AddressSpace,
    ) -> MemoryResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.copy_in_into(ptr, &mut buf, space)?;
        Ok(buf)
    }

    fn copy_in_into(
        &self,
        ptr: UserPtr,
        buf: &mut [u8],
        space: &dyn AddressSpace,
    ) -> MemoryResult<()> {
        self.check_range(ptr, buf.len(), space)?;
        space.read(ptr.addr(), buf)
    }

    /// Copy kernel bytes out to user memory
    pub fn copy_out(&self, ptr: UserPtr, data: &[u8], space: &dyn AddressSpace) -> MemoryResult<()> {
        self.check_range(ptr, data.len(), space)?;
        space.write(ptr.addr(), data)
    }

    /// Copy a NUL-terminated user string
    ///
    /// Each page is validated as the walk reaches it, so a string running
    /// off the end of mapped memory is a bad address. A string with no NUL
    /// within `max_len` bytes is `Unterminated`.
    pub fn copy_in_string(
        &self,
        ptr: UserPtr,
        max_len: usize,
        space: &dyn AddressSpace,
    ) -> MemoryResult<String> {
        if !self.is_safe(ptr.addr(), space) {
            return Err(MemoryError::BadAddress(ptr.addr()));
        }

        let mut bytes = Vec::new();
        let mut cursor = ptr.addr();
        while bytes.len() < max_len {
            if cursor % PAGE_SIZE == 0 && !self.is_safe(cursor, space) {
                return Err(MemoryError::BadAddress(cursor));
            }

            // Read up to the end of the current page in one go
            let room = (PAGE_SIZE - cursor % PAGE_SIZE).min(max_len - bytes.len());
            let mut chunk = vec![0u8; room];
            space.read(cursor, &mut chunk)?;

            if let Some(nul) = chunk.iter().position(|b| *b == 0) {
                bytes.extend_from_slice(&chunk[..nul]);
                return String::from_utf8(bytes)
                    .map_err(|_| MemoryError::MalformedString(ptr.addr()));
            }
            bytes.extend_from_slice(&chunk);

            cursor = match cursor.checked_add(room) {
                Some(next) => next,
                None => return Err(MemoryError::BadAddress(cursor)),
            };
        }

        Err(MemoryError::Unterminated {
            address: ptr.addr(),
            limit: max_len,
        })
    }
}
