/*!
 * Per-Process File Descriptor Table
 *
 * Maps small integer handles to open file objects. Handles start at 2
 * (0 and 1 belong to the console and are never in the table) and increase
 * monotonically; a closed handle is never handed out again.
 */

use crate::core::limits::FIRST_FILE_HANDLE;
use crate::core::types::Fd;
use crate::vfs::OpenFile;
use std::collections::BTreeMap;
use std::fmt;

/// Open file table owned by one process
#[derive(Default)]
pub struct FdTable {
    next: Fd,
    files: BTreeMap<Fd, Box<dyn OpenFile>>,
}

impl FdTable {
    pub fn new() -> Self {
        Self {
            next: FIRST_FILE_HANDLE,
            files: BTreeMap::new(),
        }
    }

    /// Install `file` under a fresh handle
    ///
    /// Returns `None` once the handle space is exhausted; the file object is
    /// dropped (closed) in that case.
    pub fn insert(&mut self, file: Box<dyn OpenFile>) -> Option<Fd> {
        let fd = self.next.max(FIRST_FILE_HANDLE);
        self.next = fd.checked_add(1)?;
        self.files.insert(fd, file);
        Some(fd)
    }

    pub fn get_mut(&mut self, fd: Fd) -> Option<&mut (dyn OpenFile + 'static)> {
        self.files.get_mut(&fd).map(|file| file.as_mut())
    }

    pub fn contains(&self, fd: Fd) -> bool {
        self.files.contains_key(&fd)
    }

    /// Close one handle; `false` if it was not open
    pub fn close(&mut self, fd: Fd) -> bool {
        self.files.remove(&fd).is_some()
    }

    /// Close every handle, returning how many were open
    pub fn close_all(&mut self) -> usize {
        let count = self.files.len();
        self.files.clear();
        count
    }

    /// Open handles in ascending order
    pub fn handles(&self) -> Vec<Fd> {
        self.files.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl fmt::Debug for FdTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FdTable")
            .field("next", &self.next)
            .field("open", &self.handles())
            .finish()
    }
}
