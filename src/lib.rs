/*!
 * Trapgate Kernel Library
 * User-process system-call boundary exposed as a library
 */

pub mod core;
pub mod devices;
pub mod memory;
pub mod monitoring;
pub mod process;
pub mod syscalls;
pub mod user;
pub mod vfs;

// Re-exports
pub use crate::core::{ConfigError, KernelConfig, UnknownSyscallPolicy};
pub use devices::{BufferConsole, Console, PowerControl, PowerLatch, StdConsole};
pub use memory::{is_safe, AddressSpace, MemoryError, PageTable, PointerValidator, UserPtr};
pub use monitoring::init_tracing;
pub use process::{Process, ProcessLoader, ProcessManager, SpawnError};
pub use syscalls::{
    Completion, Syscall, SyscallError, SyscallExecutor, SyscallNumber, TrapFrame, TrapOutcome,
};
pub use user::{ThreadLoader, Trapped, UserProcess};
pub use vfs::{FileSystem, MemFs, OpenFile};
