/*!
 * Process Module
 * Process records, parent/child relationships, and lifecycle coordination
 */

pub mod fd_table;
pub mod lifecycle;
pub mod manager;
pub mod relationship;
pub mod traits;
pub mod types;

pub use fd_table::FdTable;
pub use lifecycle::{program_name, Lifecycle};
pub use manager::ProcessManager;
pub use relationship::ProcessRelationship;
pub use traits::ProcessLoader;
pub use types::{Process, ProcessInfo, ProcessState, SpawnError};
