/*!
 * Core Types
 * Common types used across the kernel
 */

/// Process ID type (user-visible, `-1` signals failure)
pub type Pid = i32;

/// File descriptor type
pub type Fd = i32;

/// Virtual address in a process address space
pub type Address = usize;

/// Machine word as laid out on the user stack
pub type Word = u32;

/// Exit status reported by a terminating process
pub type ExitStatus = i32;
