/*!
 * Simulated Page Table
 *
 * Sparse page map backing a hosted address space. Pages are zero-filled on
 * mapping and flagged user or kernel; only user pages satisfy the
 * validator, while kernel-side copies may touch any present page.
 */

use super::traits::AddressSpace;
use super::types::{MemoryError, MemoryResult};
use crate::core::limits::PAGE_SIZE;
use crate::core::types::Address;
use parking_lot::RwLock;
use std::collections::HashMap;

#[inline(always)]
const fn page_number(addr: Address) -> usize {
    addr / PAGE_SIZE
}

#[inline(always)]
const fn page_offset(addr: Address) -> usize {
    addr % PAGE_SIZE
}

struct Page {
    frame: Box<[u8; PAGE_SIZE]>,
    user: bool,
}

impl Page {
    fn zeroed(user: bool) -> Self {
        Self {
            frame: Box::new([0u8; PAGE_SIZE]),
            user,
        }
    }
}

/// Hosted page table
#[derive(Default)]
pub struct PageTable {
    pages: RwLock<HashMap<usize, Page>>,
}

impl PageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every page overlapping `[base, base + len)` as user memory
    pub fn map_user(&self, base: Address, len: usize) {
        self.map(base, len, true);
    }

    /// Map every page overlapping `[base, base + len)` as kernel-only memory
    pub fn map_kernel(&self, base: Address, len: usize) {
        self.map(base, len, false);
    }

    /// Remove every page overlapping `[base, base + len)`
    pub fn unmap(&self, base: Address, len: usize) {
        let mut pages = self.pages.write();
        for page in Self::page_span(base, len) {
            pages.remove(&page);
        }
    }

    /// Number of present pages
    pub fn mapped_pages(&self) -> usize {
        self.pages.read().len()
    }

    fn map(&self, base: Address, len: usize, user: bool) {
        let mut pages = self.pages.write();
        for page in Self::page_span(base, len) {
            // Remapping keeps contents and only updates the access bit
            pages
                .entry(page)
                .and_modify(|p| p.user = user)
                .or_insert_with(|| Page::zeroed(user));
        }
    }

    fn page_span(base: Address, len: usize) -> std::ops::RangeInclusive<usize> {
        let last = base.saturating_add(len.max(1) - 1);
        page_number(base)..=page_number(last)
    }

    /// Walk `[addr, addr + len)` page by page, handing each chunk to `f`
    /// as (page frame, offset in frame, offset in caller buffer, chunk len)
    fn walk<F>(&self, addr: Address, len: usize, mut f: F) -> MemoryResult<()>
    where
        F: FnMut(&mut Page, usize, usize, usize),
    {
        if len == 0 {
            return Ok(());
        }
        addr.checked_add(len - 1)
            .ok_or(MemoryError::Unmapped(addr))?;

        let mut pages = self.pages.write();
        let mut done = 0;
        while done < len {
            let cursor = addr + done;
            let offset = page_offset(cursor);
            let chunk = (PAGE_SIZE - offset).min(len - done);
            let page = pages
                .get_mut(&page_number(cursor))
                .ok_or(MemoryError::Unmapped(cursor))?;
            f(page, offset, done, chunk);
            done += chunk;
        }
        Ok(())
    }
}

impl AddressSpace for PageTable {
    fn is_user_mapped(&self, addr: Address) -> bool {
        self.pages
            .read()
            .get(&page_number(addr))
            .map_or(false, |page| page.user)
    }

    fn read(&self, addr: Address, buf: &mut [u8]) -> MemoryResult<()> {
        let len = buf.len();
        self.walk(addr, len, |page, offset, at, chunk| {
            buf[at..at + chunk].copy_from_slice(&page.frame[offset..offset + chunk]);
        })
    }

    fn write(&self, addr: Address, data: &[u8]) -> MemoryResult<()> {
        self.walk(addr, data.len(), |page, offset, at, chunk| {
            page.frame[offset..offset + chunk].copy_from_slice(&data[at..at + chunk]);
        })
    }
}
