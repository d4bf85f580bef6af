/*!
 * Memory Traits
 * Address-space collaborator interface
 */

use super::types::MemoryResult;
use crate::core::types::Address;

/// A process's virtual address space as seen from the kernel
///
/// `is_user_mapped` is the only query the pointer validator relies on. The
/// copy operations are the kernel's own accesses; they report a page fault
/// instead of faulting the kernel when a page is missing, but the syscall
/// layer never calls them on an address that has not passed validation.
pub trait AddressSpace: Send + Sync {
    /// Is the page holding `addr` present and user-accessible
    fn is_user_mapped(&self, addr: Address) -> bool;

    /// Copy `buf.len()` bytes starting at `addr` into `buf`
    fn read(&self, addr: Address, buf: &mut [u8]) -> MemoryResult<()>;

    /// Copy `data` into memory starting at `addr`
    fn write(&self, addr: Address, data: &[u8]) -> MemoryResult<()>;
}
