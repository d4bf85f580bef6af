/*!
 * Syscall Types
 * Numbers, decoded requests, handler results and errors
 */

pub mod errors;
pub mod number;
pub mod results;
pub mod syscall;

pub use errors::{SyscallError, SyscallResult};
pub use number::SyscallNumber;
pub use results::Completion;
pub use syscall::Syscall;
