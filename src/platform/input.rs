//! Pointer input port
//!
//! Event callbacks post the latest pointer x; the frame driver takes it once
//! per frame. Last write wins, nothing queues.

use std::cell::Cell;
use std::rc::Rc;

/// Single-slot mailbox for the drill's horizontal position
#[derive(Debug, Clone, Default)]
pub struct InputPort {
    slot: Rc<Cell<Option<f32>>>,
}

impl InputPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the pending pointer x (non-finite values are dropped)
    pub fn post(&self, x: f32) {
        if x.is_finite() {
            self.slot.set(Some(x));
        }
    }

    /// Take the pending pointer x, leaving the slot empty
    pub fn take(&self) -> Option<f32> {
        self.slot.take()
    }

    /// Discard anything pending (new session)
    pub fn clear(&self) {
        self.slot.set(None);
    }
}
