//! Millisecond uptime from the embassy time driver

use embassy_time::Instant;
use triage_core::traits::Clock;

pub struct UptimeClock;

impl Clock for UptimeClock {
    fn now_ms(&self) -> u32 {
        // Truncation gives the wrapping clock the core expects
        Instant::now().as_millis() as u32
    }
}
