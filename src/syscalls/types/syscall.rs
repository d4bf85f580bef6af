/*!
 * Syscall Definitions
 * Typed syscall requests decoded from raw stack words
 */

use super::number::SyscallNumber;
use crate::core::limits::{PID_ERROR, STDIN_FILENO};
use crate::core::types::{Fd, Pid, Word};
use crate::memory::UserPtr;

/// One decoded system call
///
/// Pointer arguments are carried as `UserPtr` and are untrusted until a
/// handler runs them through the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syscall {
    Halt,
    Exit { status: i32 },
    Exec { cmd_line: UserPtr },
    Wait { pid: Pid },
    Create { name: UserPtr, initial_size: u32 },
    Remove { name: UserPtr },
    Open { name: UserPtr },
    Filesize { fd: Fd },
    Read { fd: Fd, buffer: UserPtr, size: u32 },
    Write { fd: Fd, buffer: UserPtr, size: u32 },
    Seek { fd: Fd, position: u32 },
    Tell { fd: Fd },
    Close { fd: Fd },
}

impl Syscall {
    /// Build a request from its number and argument words
    ///
    /// Missing words read as zero; the marshaller always supplies `arity()`
    /// of them.
    pub fn decode(number: SyscallNumber, args: &[Word]) -> Self {
        let word = |i: usize| args.get(i).copied().unwrap_or(0);
        let int = |i: usize| word(i) as i32;
        let ptr = |i: usize| UserPtr::from_word(word(i));

        match number {
            SyscallNumber::Halt => Syscall::Halt,
            SyscallNumber::Exit => Syscall::Exit { status: int(0) },
            SyscallNumber::Exec => Syscall::Exec { cmd_line: ptr(0) },
            SyscallNumber::Wait => Syscall::Wait { pid: int(0) },
            SyscallNumber::Create => Syscall::Create {
                name: ptr(0),
                initial_size: word(1),
            },
            SyscallNumber::Remove => Syscall::Remove { name: ptr(0) },
            SyscallNumber::Open => Syscall::Open { name: ptr(0) },
            SyscallNumber::Filesize => Syscall::Filesize { fd: int(0) },
            SyscallNumber::Read => Syscall::Read {
                fd: int(0),
                buffer: ptr(1),
                size: word(2),
            },
            SyscallNumber::Write => Syscall::Write {
                fd: int(0),
                buffer: ptr(1),
                size: word(2),
            },
            SyscallNumber::Seek => Syscall::Seek {
                fd: int(0),
                position: word(1),
            },
            SyscallNumber::Tell => Syscall::Tell { fd: int(0) },
            SyscallNumber::Close => Syscall::Close { fd: int(0) },
        }
    }

    pub fn number(&self) -> SyscallNumber {
        match self {
            Syscall::Halt => SyscallNumber::Halt,
            Syscall::Exit { .. } => SyscallNumber::Exit,
            Syscall::Exec { .. } => SyscallNumber::Exec,
            Syscall::Wait { .. } => SyscallNumber::Wait,
            Syscall::Create { .. } => SyscallNumber::Create,
            Syscall::Remove { .. } => SyscallNumber::Remove,
            Syscall::Open { .. } => SyscallNumber::Open,
            Syscall::Filesize { .. } => SyscallNumber::Filesize,
            Syscall::Read { .. } => SyscallNumber::Read,
            Syscall::Write { .. } => SyscallNumber::Write,
            Syscall::Seek { .. } => SyscallNumber::Seek,
            Syscall::Tell { .. } => SyscallNumber::Tell,
            Syscall::Close { .. } => SyscallNumber::Close,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.number().name()
    }

    /// Whether the call can block its thread for an unbounded time
    ///
    /// exec and wait sleep on another process, a console read waits for
    /// keystrokes, and exit or halt may contend with a waiting parent.
    pub fn may_block(&self) -> bool {
        match self {
            Syscall::Halt | Syscall::Exit { .. } | Syscall::Exec { .. } | Syscall::Wait { .. } => {
                true
            }
            Syscall::Read { fd, .. } => *fd == STDIN_FILENO,
            _ => false,
        }
    }

    /// Value written to the return slot when the call fails recoverably
    ///
    /// Boolean calls report false (0); void calls leave the slot untouched.
    pub fn failure_value(&self) -> Option<i32> {
        match self {
            Syscall::Create { .. } | Syscall::Remove { .. } => Some(0),
            Syscall::Seek { .. } | Syscall::Close { .. } => None,
            Syscall::Halt | Syscall::Exit { .. } => None,
            Syscall::Exec { .. } => Some(PID_ERROR),
            _ => Some(-1),
        }
    }
}
