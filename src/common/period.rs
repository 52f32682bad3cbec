// src/common/period.rs

use super::timing::as_ticks;
use core::time::Duration;

/// A restartable millisecond period measured against a wrapping clock.
///
/// A period of zero is disabled: [`passed`](MsPeriod::passed) never fires.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct MsPeriod {
    start: u32,
    period: u32,
}

impl MsPeriod {
    pub const fn new() -> Self {
        MsPeriod { start: 0, period: 0 }
    }

    pub fn set(&mut self, period: Duration) {
        self.period = as_ticks(period);
    }

    pub fn set_ms(&mut self, period_ms: u32) {
        self.period = period_ms;
    }

    /// Marks `now` as the beginning of the period.
    pub fn start(&mut self, now: u32) {
        self.start = now;
    }

    pub fn disable(&mut self) {
        self.period = 0;
    }

    #[inline]
    pub const fn is_enabled(&self) -> bool {
        self.period != 0
    }

    pub fn passed(&self, now: u32) -> bool {
        self.period != 0 && now.wrapping_sub(self.start) >= self.period
    }
}
