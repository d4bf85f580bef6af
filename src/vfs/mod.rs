/*!
 * Virtual File System Module
 * Filesystem collaborator interface, the system-wide filesystem lock, and
 * an in-memory backend
 */

pub mod filesys;
pub mod memory;
pub mod traits;

// Re-exports
pub use filesys::{Filesys, FilesysGuard};
pub use memory::MemFs;
pub use traits::{FileSystem, OpenFile};
