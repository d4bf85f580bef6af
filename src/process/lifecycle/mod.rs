/*!
 * Process Lifecycle Management
 * Exec, wait and exit coordination
 */

pub mod lifecycle;

pub use lifecycle::{program_name, Lifecycle};
