/*!
 * One-Shot Signal
 *
 * Condvar-guarded slot that can be posted exactly once and consumed exactly
 * once. Waiters block until the value is posted; the first waiter takes it,
 * every later waiter observes that it is gone.
 */

use parking_lot::{Condvar, Mutex};

/// Outcome of posting a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostResult {
    /// Value stored, any blocked waiter woken
    Posted,
    /// A value was already posted; the new one was dropped
    AlreadyPosted,
}

impl PostResult {
    #[inline(always)]
    pub fn is_posted(&self) -> bool {
        matches!(self, PostResult::Posted)
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot<T> {
    Empty,
    Posted(T),
    Taken(T),
}

/// Single-use signal carrying a `Copy` value
#[derive(Debug)]
pub struct OneShot<T: Copy> {
    slot: Mutex<Slot<T>>,
    ready: Condvar,
}

impl<T: Copy> OneShot<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Empty),
            ready: Condvar::new(),
        }
    }

    /// Post the value and wake waiters. Only the first post counts.
    pub fn post(&self, value: T) -> PostResult {
        let mut slot = self.slot.lock();
        match *slot {
            Slot::Empty => {
                *slot = Slot::Posted(value);
                self.ready.notify_all();
                PostResult::Posted
            }
            Slot::Posted(_) | Slot::Taken(_) => PostResult::AlreadyPosted,
        }
    }

    /// Block until posted, then consume the value.
    ///
    /// Returns `None` if another waiter already consumed it.
    pub fn wait(&self) -> Option<T> {
        let mut slot = self.slot.lock();
        loop {
            match *slot {
                Slot::Empty => self.ready.wait(&mut slot),
                Slot::Posted(value) => {
                    *slot = Slot::Taken(value);
                    return Some(value);
                }
                Slot::Taken(_) => return None,
            }
        }
    }

    /// Non-blocking, non-consuming look at the posted value
    pub fn peek(&self) -> Option<T> {
        match *self.slot.lock() {
            Slot::Empty => None,
            Slot::Posted(value) | Slot::Taken(value) => Some(value),
        }
    }

    /// Whether a value has been posted (consumed or not)
    pub fn is_posted(&self) -> bool {
        !matches!(*self.slot.lock(), Slot::Empty)
    }

    /// Whether a waiter has already consumed the value
    pub fn is_consumed(&self) -> bool {
        matches!(*self.slot.lock(), Slot::Taken(_))
    }
}

impl<T: Copy> Default for OneShot<T> {
    fn default() -> Self {
        Self::new()
    }
}
