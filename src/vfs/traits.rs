/*!
 * VFS Traits
 * Filesystem primitives the syscall layer is allowed to use
 */

/// Filesystem collaborator
///
/// Names are flat strings; the syscall layer never interprets them.
pub trait FileSystem: Send + Sync {
    /// Create a file of `initial_size` zero bytes; false if it exists or
    /// cannot be created
    fn create(&self, name: &str, initial_size: u64) -> bool;

    /// Delete the named file; open handles keep working until closed
    fn remove(&self, name: &str) -> bool;

    /// Open the named file
    fn open(&self, name: &str) -> Option<Box<dyn OpenFile>>;

    /// Get filesystem name/type
    fn name(&self) -> &str;
}

/// Open file object
///
/// Owned exclusively by one open-file record. Closed when dropped.
pub trait OpenFile: Send {
    /// Read from the current position; returns bytes actually read
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Write at the current position; returns bytes actually written
    fn write(&mut self, data: &[u8]) -> usize;

    /// Set the position of the next byte read or written
    fn seek(&mut self, position: u64);

    /// Position of the next byte read or written
    fn tell(&self) -> u64;

    /// Current length in bytes
    fn length(&self) -> u64;
}
