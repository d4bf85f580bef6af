/*!
 * User Image Layout
 * Fixed regions mapped into every hosted user address space
 */

use crate::core::limits::{PAGE_SIZE, PHYS_BASE};
use crate::core::types::Address;
use crate::memory::PageTable;

/// Stack grows down from the user ceiling
pub const USER_STACK_TOP: Address = PHYS_BASE;
pub const USER_STACK_PAGES: usize = 4;

/// Start of the data region used for staging strings and buffers
pub const USER_DATA_BASE: Address = 0x0804_8000;
pub const USER_DATA_PAGES: usize = 32;

pub const USER_STACK_BASE: Address = USER_STACK_TOP - USER_STACK_PAGES * PAGE_SIZE;
pub const USER_DATA_END: Address = USER_DATA_BASE + USER_DATA_PAGES * PAGE_SIZE;

/// Map the stack and data regions as user memory
pub fn map_user_image(table: &PageTable) {
    table.map_user(USER_STACK_BASE, USER_STACK_PAGES * PAGE_SIZE);
    table.map_user(USER_DATA_BASE, USER_DATA_PAGES * PAGE_SIZE);
}
