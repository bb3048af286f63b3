//! Sensor sampler
//!
//! Reads all four sensors once per sampling tick and fuses them into a
//! [`SensorSnapshot`]. A failed read never aborts the tick: the sensor's
//! last known value is reused (or zero before the first good read) and
//! the validity flags are recomputed from that value.

use heapless::Vec;

use super::movement::{MovementStabilityTracker, MovementStatus};
use super::snapshot::{
    distance_in_range, distance_valid, temperature_valid, KnobMode, SensorSnapshot, KNOB_MAX,
};
use crate::config::{MovementConfig, SensorConfig};
use crate::traits::{
    DistanceSensor, KnobSensor, MotionSensor, SensorError, TemperatureSensor,
};

/// Number of sensors behind the sampler
pub const SENSOR_COUNT: usize = 4;

/// Identifies one of the sampled sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKind {
    Knob,
    Distance,
    Movement,
    Temperature,
}

impl SensorKind {
    /// Name reported to the host
    pub fn name(self) -> &'static str {
        match self {
            SensorKind::Knob => "knob",
            SensorKind::Distance => "distance",
            SensorKind::Movement => "movement",
            SensorKind::Temperature => "temperature",
        }
    }

    fn bit(self) -> u8 {
        match self {
            SensorKind::Knob => 1 << 0,
            SensorKind::Distance => 1 << 1,
            SensorKind::Movement => 1 << 2,
            SensorKind::Temperature => 1 << 3,
        }
    }
}

/// Sensors whose reads started failing this tick
pub type FaultEdges = Vec<(SensorKind, SensorError), SENSOR_COUNT>;

/// Outcome of one sampling tick
#[derive(Debug, Clone)]
pub struct Sample {
    pub snapshot: SensorSnapshot,
    /// Newly failing sensors; a persisting fault is reported only once
    pub new_faults: FaultEdges,
}

/// Borrowed sensor set for one sampling tick
pub struct SensorSet<'a, K, D, M, T> {
    pub knob: &'a mut K,
    pub distance: &'a mut D,
    pub motion: &'a mut M,
    pub thermometer: &'a mut T,
}

/// Fuses raw sensor reads into snapshots
#[derive(Debug, Clone)]
pub struct SensorSampler {
    config: SensorConfig,
    tracker: MovementStabilityTracker,
    last_knob: u8,
    last_distance_mm: u32,
    last_temperature_c: Option<f32>,
    /// Bit set of currently failing sensors
    failing: u8,
}

impl SensorSampler {
    pub fn new(config: SensorConfig, movement: MovementConfig, now_ms: u32) -> Self {
        Self {
            config,
            tracker: MovementStabilityTracker::new(movement, now_ms),
            last_knob: 0,
            last_distance_mm: 0,
            last_temperature_c: None,
            failing: 0,
        }
    }

    /// Returns true while reads from `sensor` keep failing
    pub fn is_failing(&self, sensor: SensorKind) -> bool {
        self.failing & sensor.bit() != 0
    }

    /// Sample every sensor once
    pub fn sample<K, D, M, T>(&mut self, sensors: SensorSet<'_, K, D, M, T>, now_ms: u32) -> Sample
    where
        K: KnobSensor,
        D: DistanceSensor,
        M: MotionSensor,
        T: TemperatureSensor,
    {
        let mut new_faults = FaultEdges::new();

        let knob = sensors.knob.read_position();
        if let Ok(raw) = knob {
            self.last_knob = raw.clamp(0, KNOB_MAX as i32) as u8;
        }
        self.track(SensorKind::Knob, knob.err(), &mut new_faults);

        let distance = sensors.distance.read_distance_mm();
        if let Ok(mm) = distance {
            self.last_distance_mm = mm.max(0) as u32;
        }
        self.track(SensorKind::Distance, distance.err(), &mut new_faults);

        let movement = self.sample_movement(sensors.motion, now_ms, &mut new_faults);

        let temperature = match sensors.thermometer.read_celsius() {
            Ok(c) if c.is_finite() => Ok(c),
            Ok(_) => Err(SensorError::InvalidData),
            Err(e) => Err(e),
        };
        if let Ok(celsius) = temperature {
            self.last_temperature_c = Some(celsius);
        }
        self.track(SensorKind::Temperature, temperature.err(), &mut new_faults);

        let cfg = &self.config;
        let snapshot = SensorSnapshot {
            knob_raw: self.last_knob,
            knob_mode: KnobMode::from_position(self.last_knob, cfg),
            distance_mm: self.last_distance_mm,
            distance_valid: distance_valid(self.last_distance_mm, cfg),
            distance_in_range: distance_in_range(self.last_distance_mm, cfg),
            movement_detected: movement.detected,
            movement_stable_duration_ms: movement.stable_duration_ms,
            temperature_c: self.last_temperature_c.unwrap_or(0.0),
            temperature_valid: self
                .last_temperature_c
                .is_some_and(|c| temperature_valid(c, cfg)),
        };

        Sample {
            snapshot,
            new_faults,
        }
    }

    fn sample_movement<M: MotionSensor>(
        &mut self,
        motion: &mut M,
        now_ms: u32,
        new_faults: &mut FaultEdges,
    ) -> MovementStatus {
        if !motion.available() {
            return self.tracker.hold(now_ms);
        }

        match motion.read_accel() {
            Ok(accel) => {
                self.track(SensorKind::Movement, None, new_faults);
                self.tracker.update(&accel, now_ms)
            }
            Err(e) => {
                self.track(SensorKind::Movement, Some(e), new_faults);
                self.tracker.hold(now_ms)
            }
        }
    }

    fn track(&mut self, sensor: SensorKind, error: Option<SensorError>, new_faults: &mut FaultEdges) {
        let was_failing = self.is_failing(sensor);
        match error {
            // No fresh measurement: the last value stands and the episode
            // state is unchanged
            Some(SensorError::NotReady) => {}
            Some(e) => {
                if !was_failing {
                    log_warn!("sensor {} read failed: {}", sensor.name(), e);
                    // Capacity equals the number of sensors
                    let _ = new_faults.push((sensor, e));
                }
                self.failing |= sensor.bit();
            }
            None => {
                if was_failing {
                    log_info!("sensor {} recovered", sensor.name());
                }
                self.failing &= !sensor.bit();
            }
        }
    }
}
