/*!
 * Synchronization Primitives
 *
 * Blocking primitives used by the process layer:
 * - One-shot signal for the exec/load handshake and exit-status delivery
 */

mod oneshot;

pub use oneshot::{OneShot, PostResult};
