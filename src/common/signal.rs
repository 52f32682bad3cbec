// src/common/signal.rs

use core::sync::atomic::{AtomicBool, Ordering};

/// A one-bit mailbox between an interrupt handler and the main loop.
///
/// One side calls [`set`](EventFlag::set), the other
/// [`take`](EventFlag::take). Suitable for a `static`.
#[derive(Debug, Default)]
pub struct EventFlag(AtomicBool);

impl EventFlag {
    pub const fn new() -> Self {
        EventFlag(AtomicBool::new(false))
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns whether the flag was set, clearing it.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
