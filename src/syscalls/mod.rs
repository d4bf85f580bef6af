/*!
 * Syscalls Module
 * System call boundary between user processes and the kernel
 */

mod executor;
mod fd;
mod fs;
mod process;
mod system;

pub mod frame;
pub mod handler;
pub mod handlers;
pub mod marshal;
pub mod types;

pub use executor::{SyscallExecutor, SyscallExecutorBuilder};
pub use frame::{TrapFrame, TrapOutcome};
pub use handler::{SyscallContext, SyscallHandler, SyscallHandlerRegistry};
pub use marshal::{ArgumentMarshaller, Decoded};
pub use types::{Completion, Syscall, SyscallError, SyscallNumber, SyscallResult};
