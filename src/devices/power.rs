/*!
 * Power Control
 */

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Machine power-off
///
/// A real kernel never returns from `power_off`; hosted implementations
/// record the request and the executor stops the calling process.
#[cfg_attr(test, mockall::automock)]
pub trait PowerControl: Send + Sync {
    fn power_off(&self);
}

/// Records that power-off was requested
#[derive(Debug, Default)]
pub struct PowerLatch {
    off: AtomicBool,
}

impl PowerLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_off(&self) -> bool {
        self.off.load(Ordering::Acquire)
    }
}

impl PowerControl for PowerLatch {
    fn power_off(&self) {
        if !self.off.swap(true, Ordering::AcqRel) {
            warn!("machine powered off");
        }
    }
}
