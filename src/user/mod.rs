/*!
 * Hosted User Mode
 * User-side trap harness and a thread-backed program loader
 */

pub mod layout;
pub mod loader;
pub mod process;

pub use loader::{Program, ThreadLoader};
pub use process::{Trapped, UserProcess, UserResult};
