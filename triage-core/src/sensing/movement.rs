//! Movement stability tracking
//!
//! The accelerometer reads about 1 g at rest. Any sample whose magnitude
//! leaves the deadband around 1 g counts as motion and restarts the
//! stability clock. Motion is only cleared after the device has stayed
//! inside the deadband for longer than the debounce window; inside the
//! window the previous verdict is kept as is.

use crate::config::MovementConfig;
use crate::traits::Acceleration;

/// Gravity baseline in g
const ONE_G: f32 = 1.0;

/// Result of one tracker update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MovementStatus {
    pub detected: bool,
    /// Milliseconds since motion was last seen
    pub stable_duration_ms: u32,
}

/// Debounced movement detector
#[derive(Debug, Clone)]
pub struct MovementStabilityTracker {
    config: MovementConfig,
    last_motion_at_ms: u32,
    detected: bool,
}

impl MovementStabilityTracker {
    /// Create a tracker; the stability clock starts at `now_ms`
    pub fn new(config: MovementConfig, now_ms: u32) -> Self {
        Self {
            config,
            last_motion_at_ms: now_ms,
            detected: false,
        }
    }

    /// Returns true if `accel` lies outside the 1 g deadband
    pub fn is_moving(&self, accel: &Acceleration) -> bool {
        libm::fabsf(accel.magnitude() - ONE_G) > self.config.deadband_g
    }

    /// Feed a fresh accelerometer sample
    pub fn update(&mut self, accel: &Acceleration, now_ms: u32) -> MovementStatus {
        if self.is_moving(accel) {
            self.detected = true;
            self.last_motion_at_ms = now_ms;
            return MovementStatus {
                detected: true,
                stable_duration_ms: 0,
            };
        }

        let still_for = now_ms.wrapping_sub(self.last_motion_at_ms);
        if still_for > self.config.debounce_ms {
            self.detected = false;
        }

        MovementStatus {
            detected: self.detected,
            stable_duration_ms: still_for,
        }
    }

    /// Report status without a new sample
    ///
    /// The verdict is held; only the stable duration advances.
    pub fn hold(&self, now_ms: u32) -> MovementStatus {
        MovementStatus {
            detected: self.detected,
            stable_duration_ms: now_ms.wrapping_sub(self.last_motion_at_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const AT_REST: Acceleration = Acceleration::new(0.0, 0.0, 1.0);
    const SHAKEN: Acceleration = Acceleration::new(0.5, 0.2, 1.3);

    fn tracker() -> MovementStabilityTracker {
        MovementStabilityTracker::new(MovementConfig::default(), 0)
    }

    #[test]
    fn test_motion_detected_immediately() {
        let mut tracker = tracker();
        let status = tracker.update(&SHAKEN, 1000);
        assert_eq!(
            status,
            MovementStatus {
                detected: true,
                stable_duration_ms: 0
            }
        );
    }

    #[test]
    fn test_deadband_edges() {
        let tracker = tracker();
        assert!(!tracker.is_moving(&Acceleration::new(0.0, 0.0, 1.1)));
        assert!(!tracker.is_moving(&Acceleration::new(0.0, 0.0, 0.9)));
        assert!(tracker.is_moving(&Acceleration::new(0.0, 0.0, 1.2)));
        assert!(tracker.is_moving(&Acceleration::new(0.0, 0.0, 0.8)));
        // Free fall
        assert!(tracker.is_moving(&Acceleration::default()));
    }

    #[test]
    fn test_detection_held_through_debounce_window() {
        let mut tracker = tracker();
        tracker.update(&SHAKEN, 1000);

        let status = tracker.update(&AT_REST, 1200);
        assert!(status.detected);
        assert_eq!(status.stable_duration_ms, 200);

        // Exactly at the edge of the window the verdict still holds
        let status = tracker.update(&AT_REST, 1500);
        assert!(status.detected);
        assert_eq!(status.stable_duration_ms, 500);

        let status = tracker.update(&AT_REST, 1501);
        assert!(!status.detected);
        assert_eq!(status.stable_duration_ms, 501);
    }

    #[test]
    fn test_not_detected_before_any_motion() {
        let mut tracker = tracker();
        let status = tracker.update(&AT_REST, 100);
        assert!(!status.detected);
        assert_eq!(status.stable_duration_ms, 100);
    }

    #[test]
    fn test_hold_keeps_verdict() {
        let mut tracker = tracker();
        tracker.update(&SHAKEN, 1000);

        let status = tracker.hold(5000);
        assert!(status.detected);
        assert_eq!(status.stable_duration_ms, 4000);
    }

    #[test]
    fn test_clock_wraparound() {
        let mut tracker = MovementStabilityTracker::new(MovementConfig::default(), u32::MAX - 100);
        let status = tracker.update(&AT_REST, 50);
        assert_eq!(status.stable_duration_ms, 151);
    }

    proptest! {
        #[test]
        fn prop_stable_duration_monotonic(steps in proptest::collection::vec(1u32..200, 1..50)) {
            let mut tracker = tracker();
            tracker.update(&SHAKEN, 0);

            let mut now = 0;
            let mut previous = 0;
            for step in steps {
                now += step;
                let status = tracker.update(&AT_REST, now);
                prop_assert!(status.stable_duration_ms >= previous);
                prop_assert_eq!(status.stable_duration_ms, now);
                prop_assert_eq!(status.detected, now <= 500);
                previous = status.stable_duration_ms;
            }
        }
    }
}
