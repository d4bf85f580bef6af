/*!
 * Syscall Handlers Module
 * Contains all syscall category handlers
 */

mod fd_handler;
mod fs_handler;
mod process_handler;
mod system_handler;

pub use fd_handler::FileDescriptorHandler;
pub use fs_handler::FileSystemHandler;
pub use process_handler::ProcessHandler;
pub use system_handler::SystemHandler;
