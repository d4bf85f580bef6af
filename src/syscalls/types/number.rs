/*!
 * Syscall Numbers
 * The fixed trap ABI table
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Syscall identifier as pushed by user code in stack word 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum SyscallNumber {
    Halt = 0,
    Exit = 1,
    Exec = 2,
    Wait = 3,
    Create = 4,
    Remove = 5,
    Open = 6,
    Filesize = 7,
    Read = 8,
    Write = 9,
    Seek = 10,
    Tell = 11,
    Close = 12,
}

impl SyscallNumber {
    pub const ALL: [SyscallNumber; 13] = [
        SyscallNumber::Halt,
        SyscallNumber::Exit,
        SyscallNumber::Exec,
        SyscallNumber::Wait,
        SyscallNumber::Create,
        SyscallNumber::Remove,
        SyscallNumber::Open,
        SyscallNumber::Filesize,
        SyscallNumber::Read,
        SyscallNumber::Write,
        SyscallNumber::Seek,
        SyscallNumber::Tell,
        SyscallNumber::Close,
    ];

    /// Number of argument words following the syscall number
    pub const fn arity(self) -> usize {
        match self {
            SyscallNumber::Halt => 0,
            SyscallNumber::Exit
            | SyscallNumber::Exec
            | SyscallNumber::Wait
            | SyscallNumber::Remove
            | SyscallNumber::Open
            | SyscallNumber::Filesize
            | SyscallNumber::Tell
            | SyscallNumber::Close => 1,
            SyscallNumber::Create | SyscallNumber::Seek => 2,
            SyscallNumber::Read | SyscallNumber::Write => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SyscallNumber::Halt => "halt",
            SyscallNumber::Exit => "exit",
            SyscallNumber::Exec => "exec",
            SyscallNumber::Wait => "wait",
            SyscallNumber::Create => "create",
            SyscallNumber::Remove => "remove",
            SyscallNumber::Open => "open",
            SyscallNumber::Filesize => "filesize",
            SyscallNumber::Read => "read",
            SyscallNumber::Write => "write",
            SyscallNumber::Seek => "seek",
            SyscallNumber::Tell => "tell",
            SyscallNumber::Close => "close",
        }
    }
}

impl TryFrom<u32> for SyscallNumber {
    type Error = u32;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::ALL.get(raw as usize).copied().ok_or(raw)
    }
}

impl From<SyscallNumber> for u32 {
    fn from(number: SyscallNumber) -> Self {
        number as u32
    }
}

impl fmt::Display for SyscallNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
