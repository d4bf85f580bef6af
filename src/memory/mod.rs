/*!
 * Memory Module
 * User address spaces and the pointer validator guarding every user access
 */

pub mod page_table;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export for convenience
pub use page_table::PageTable;
pub use traits::AddressSpace;
pub use types::*;
pub use validation::{is_safe, PointerValidator};
