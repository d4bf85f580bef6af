/*!
 * Argument Marshalling
 *
 * Reads the syscall number and argument words off the user stack. Each
 * slot is validated before it is read, and only as many argument words as
 * the syscall takes are touched, so a frame sitting at the very top of a
 * mapped region is fine for short calls.
 */

use super::types::{Syscall, SyscallNumber};
use crate::core::limits::{MAX_SYSCALL_ARGS, WORD_SIZE};
use crate::core::types::{Address, Word};
use crate::memory::{AddressSpace, MemoryError, MemoryResult, PointerValidator};

/// Result of decoding a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Known(Syscall),
    /// Number outside the table; no argument words were read
    Unknown(u32),
}

/// Reader over one trap's user stack
pub struct ArgumentMarshaller<'a> {
    validator: &'a PointerValidator,
    space: &'a dyn AddressSpace,
    esp: Address,
}

impl<'a> ArgumentMarshaller<'a> {
    pub fn new(validator: &'a PointerValidator, space: &'a dyn AddressSpace, esp: Address) -> Self {
        Self {
            validator,
            space,
            esp,
        }
    }

    /// Stack word `index` (0 = syscall number)
    pub fn word(&self, index: usize) -> MemoryResult<Word> {
        let addr = index
            .checked_mul(WORD_SIZE)
            .and_then(|offset| self.esp.checked_add(offset))
            .ok_or(MemoryError::BadAddress(self.esp))?;
        self.validator.read_word(addr, self.space)
    }

    pub fn decode(&self) -> MemoryResult<Decoded> {
        let raw = self.word(0)?;
        let number = match SyscallNumber::try_from(raw) {
            Ok(number) => number,
            Err(raw) => return Ok(Decoded::Unknown(raw)),
        };

        let mut args = [0 as Word; MAX_SYSCALL_ARGS];
        for (i, slot) in args.iter_mut().take(number.arity()).enumerate() {
            *slot = self.word(i + 1)?;
        }
        Ok(Decoded::Known(Syscall::decode(number, &args[..number.arity()])))
    }
}
