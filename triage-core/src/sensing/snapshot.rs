//! Fused sensor snapshot and the classification rules behind its flags

use triage_protocol::{DistanceData, KnobData, MovementData, SensorData, TemperatureData};

use crate::config::SensorConfig;

/// Full-scale knob position
pub const KNOB_MAX: u8 = 100;

/// Knob supply voltage, used to report the wiper voltage
const KNOB_SUPPLY_V: f32 = 3.3;

/// Examination mode selected with the knob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KnobMode {
    #[default]
    Heart,
    Lung,
    Calibration,
}

impl KnobMode {
    /// Classify a knob position (already clamped to 0..=100)
    pub fn from_position(raw: u8, config: &SensorConfig) -> Self {
        if raw < config.knob_lung_from {
            KnobMode::Heart
        } else if raw < config.knob_calibration_from {
            KnobMode::Lung
        } else {
            KnobMode::Calibration
        }
    }

    /// Numeric code used on the wire
    pub fn code(self) -> u8 {
        match self {
            KnobMode::Heart => 0,
            KnobMode::Lung => 1,
            KnobMode::Calibration => 2,
        }
    }

    /// Short label for the display header
    pub fn label(self) -> &'static str {
        match self {
            KnobMode::Heart => "HEART",
            KnobMode::Lung => "LUNG",
            KnobMode::Calibration => "CALIB",
        }
    }
}

/// `0 < mm < max`
pub fn distance_valid(mm: u32, config: &SensorConfig) -> bool {
    mm > 0 && mm < config.distance_max_mm
}

/// `min <= mm <= max` of the examination window
pub fn distance_in_range(mm: u32, config: &SensorConfig) -> bool {
    (config.in_range_min_mm..=config.in_range_max_mm).contains(&mm)
}

/// `min < t < max`; NaN is never valid
pub fn temperature_valid(celsius: f32, config: &SensorConfig) -> bool {
    celsius > config.temperature_min_c && celsius < config.temperature_max_c
}

/// One sampling tick's worth of fused readings
///
/// Replaced wholesale every tick. `Default` is the all-zero snapshot
/// exposed before the first sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSnapshot {
    pub knob_raw: u8,
    pub knob_mode: KnobMode,
    pub distance_mm: u32,
    pub distance_valid: bool,
    pub distance_in_range: bool,
    pub movement_detected: bool,
    pub movement_stable_duration_ms: u32,
    pub temperature_c: f32,
    pub temperature_valid: bool,
}

impl SensorSnapshot {
    /// Wiper voltage corresponding to the knob position
    pub fn knob_voltage(&self) -> f32 {
        self.knob_raw as f32 * KNOB_SUPPLY_V / KNOB_MAX as f32
    }

    /// Distance in centimetres
    pub fn distance_cm(&self) -> f32 {
        self.distance_mm as f32 / 10.0
    }

    /// Payload of the `sensor_data` message
    pub fn to_wire(&self) -> SensorData {
        SensorData {
            knob: KnobData {
                raw_value: self.knob_raw,
                mode: self.knob_mode.code(),
                voltage: self.knob_voltage(),
            },
            distance: DistanceData {
                value_mm: self.distance_mm,
                value_cm: self.distance_cm(),
                valid: self.distance_valid,
                in_range: self.distance_in_range,
            },
            movement: MovementData {
                detected: self.movement_detected,
                stable_duration: self.movement_stable_duration_ms,
            },
            temperature: TemperatureData {
                celsius: self.temperature_c,
                valid: self.temperature_valid,
            },
        }
    }
}
