/*!
 * Filesystem Gate
 *
 * Owns the single system-wide filesystem lock. Every syscall that touches
 * the filesystem or an open file object holds a `FilesysGuard` for the
 * whole operation; the lock is released when the guard drops, on every
 * return path.
 */

use parking_lot::{Mutex, MutexGuard};
use std::ops::Deref;
use std::sync::Arc;
use tracing::trace;

use super::traits::FileSystem;

/// Shared handle to the filesystem collaborator and its lock
#[derive(Clone)]
pub struct Filesys {
    fs: Arc<dyn FileSystem>,
    lock: Arc<Mutex<()>>,
}

impl Filesys {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Acquire the filesystem lock for the duration of one operation
    pub fn lock(&self) -> FilesysGuard<'_> {
        let guard = self.lock.lock();
        trace!(fs = self.fs.name(), "filesystem lock acquired");
        FilesysGuard {
            _guard: guard,
            fs: self.fs.as_ref(),
        }
    }

    /// Whether some thread currently holds the lock
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }
}

/// Scoped access to the filesystem while the lock is held
pub struct FilesysGuard<'a> {
    _guard: MutexGuard<'a, ()>,
    fs: &'a dyn FileSystem,
}

impl<'a> Deref for FilesysGuard<'a> {
    type Target = dyn FileSystem + 'a;

    fn deref(&self) -> &Self::Target {
        self.fs
    }
}
