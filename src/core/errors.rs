/*!
 * Error Types
 * Centralized re-exports of the per-subsystem error enums
 */

pub use crate::core::config::ConfigError;
pub use crate::memory::MemoryError;
pub use crate::process::SpawnError;
pub use crate::syscalls::types::SyscallError;
