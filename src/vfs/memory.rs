/*!
 * In-Memory Filesystem Backend
 * Fast, volatile filesystem for testing and the demo kernel
 *
 * Flat namespace of named files. Removing a name unlinks it immediately;
 * handles that are already open keep the contents alive until dropped.
 */

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::traits::{FileSystem, OpenFile};

/// Byte accounting shared by every inode of one filesystem
#[derive(Debug, Default)]
struct Usage {
    max_size: Option<usize>,
    current: AtomicUsize,
}

impl Usage {
    /// Reserve up to `wanted` bytes; returns how many were granted
    fn reserve(&self, wanted: usize) -> usize {
        let Some(max) = self.max_size else {
            self.current.fetch_add(wanted, Ordering::SeqCst);
            return wanted;
        };
        loop {
            let current = self.current.load(Ordering::SeqCst);
            let granted = wanted.min(max.saturating_sub(current));
            if self
                .current
                .compare_exchange(current, current + granted, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return granted;
            }
        }
    }

    fn release(&self, amount: usize) {
        self.current.fetch_sub(amount, Ordering::SeqCst);
    }
}

/// File contents; storage is returned to the pool when the last
/// reference (directory entry or open handle) goes away
#[derive(Debug)]
struct Inode {
    data: RwLock<Vec<u8>>,
    usage: Arc<Usage>,
}

impl Drop for Inode {
    fn drop(&mut self) {
        self.usage.release(self.data.get_mut().len());
    }
}

/// In-memory filesystem implementation
#[derive(Debug, Clone)]
pub struct MemFs {
    nodes: Arc<DashMap<String, Arc<Inode>>>,
    usage: Arc<Usage>,
}

impl MemFs {
    /// Create new in-memory filesystem
    pub fn new() -> Self {
        Self {
            nodes: Arc::new(DashMap::new()),
            usage: Arc::new(Usage::default()),
        }
    }

    /// Create with size limit; writes past the limit are cut short
    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            nodes: Arc::new(DashMap::new()),
            usage: Arc::new(Usage {
                max_size: Some(max_size),
                current: AtomicUsize::new(0),
            }),
        }
    }

    /// Is `name` currently linked
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Number of linked files
    pub fn file_count(&self) -> usize {
        self.nodes.len()
    }

    /// Bytes held by all live inodes, linked or not
    pub fn bytes_used(&self) -> usize {
        self.usage.current.load(Ordering::SeqCst)
    }

    /// Snapshot of a file's contents
    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        self.nodes.get(name).map(|inode| inode.data.read().clone())
    }
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MemFs {
    fn create(&self, name: &str, initial_size: u64) -> bool {
        if name.is_empty() {
            return false;
        }
        let Ok(size) = usize::try_from(initial_size) else {
            return false;
        };

        match self.nodes.entry(name.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                let granted = self.usage.reserve(size);
                if granted < size {
                    self.usage.release(granted);
                    return false;
                }
                slot.insert(Arc::new(Inode {
                    data: RwLock::new(vec![0u8; size]),
                    usage: self.usage.clone(),
                }));
                true
            }
        }
    }

    fn remove(&self, name: &str) -> bool {
        self.nodes.remove(name).is_some()
    }

    fn open(&self, name: &str) -> Option<Box<dyn OpenFile>> {
        let inode = self.nodes.get(name)?.value().clone();
        Some(Box::new(MemFile { inode, position: 0 }))
    }

    fn name(&self) -> &str {
        "memfs"
    }
}

/// Open handle into a `MemFs` inode
#[derive(Debug)]
pub struct MemFile {
    inode: Arc<Inode>,
    position: u64,
}

impl OpenFile for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let data = self.inode.data.read();
        let Ok(start) = usize::try_from(self.position) else {
            return 0;
        };
        if start >= data.len() {
            return 0;
        }
        let count = buf.len().min(data.len() - start);
        buf[..count].copy_from_slice(&data[start..start + count]);
        self.position += count as u64;
        count
    }

    fn write(&mut self, input: &[u8]) -> usize {
        let mut data = self.inode.data.write();
        let Ok(start) = usize::try_from(self.position) else {
            return 0;
        };
        let Some(wanted_end) = start.checked_add(input.len()) else {
            return 0;
        };

        let growth = wanted_end.saturating_sub(data.len());
        let granted = self.inode.usage.reserve(growth);
        let end = wanted_end - (growth - granted);
        if end <= start {
            self.inode.usage.release(granted);
            return 0;
        }

        if end > data.len() {
            data.resize(end, 0);
        }
        let count = end - start;
        data[start..end].copy_from_slice(&input[..count]);
        self.position += count as u64;
        count
    }

    fn seek(&mut self, position: u64) {
        self.position = position;
    }

    fn tell(&self) -> u64 {
        self.position
    }

    fn length(&self) -> u64 {
        self.inode.data.read().len() as u64
    }
}
