/*!
 * Devices
 * Console and power-off collaborators used by the syscall layer
 */

pub mod console;
pub mod power;

pub use console::{BufferConsole, Console, StdConsole};
pub use power::{PowerControl, PowerLatch};
