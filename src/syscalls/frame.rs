/*!
 * Trap Frame
 * The slice of interrupted user state the syscall path reads and writes
 */

use crate::core::types::{Address, ExitStatus};

/// Register state saved at `int 0x30`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrapFrame {
    /// User stack pointer; word 0 is the syscall number
    pub esp: Address,
    /// Return-value register
    pub eax: u32,
}

impl TrapFrame {
    pub const fn new(esp: Address) -> Self {
        Self { esp, eax: 0 }
    }

    /// Return slot as the signed value user code sees
    #[inline]
    pub const fn return_value(&self) -> i32 {
        self.eax as i32
    }

    #[inline]
    pub fn set_return(&mut self, value: i32) {
        self.eax = value as u32;
    }
}

/// What happens to the calling process after a trap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapOutcome {
    /// Return to user mode
    Resume,
    /// The process is gone with this status
    Terminated(ExitStatus),
    /// The machine powered off
    Halted,
}

impl TrapOutcome {
    #[inline]
    pub fn is_resume(&self) -> bool {
        matches!(self, TrapOutcome::Resume)
    }
}
