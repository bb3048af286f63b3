//! Elapsed-time timers
//!
//! Each cooperative activity owns one [`PeriodicTimer`]. The loop polls
//! them with the current clock reading; a timer fires when at least one
//! period has elapsed and then re-arms at the poll time, so a late poll
//! causes one late firing instead of a burst of catch-up firings.

/// Periodic timer over a wrapping millisecond clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriodicTimer {
    period_ms: u32,
    last_fire_ms: u32,
}

impl PeriodicTimer {
    /// Create a timer whose first firing is one period after `now_ms`
    pub const fn new(period_ms: u32, now_ms: u32) -> Self {
        Self {
            period_ms,
            last_fire_ms: now_ms,
        }
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Restart the period at `now_ms`
    pub fn reset(&mut self, now_ms: u32) {
        self.last_fire_ms = now_ms;
    }

    /// Returns true (and re-arms) if the period has elapsed
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_fire_ms) >= self.period_ms {
            self.last_fire_ms = now_ms;
            true
        } else {
            false
        }
    }
}
