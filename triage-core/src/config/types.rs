//! Configuration type definitions
//!
//! Every tunable of the control loop lives here. [`FirmwareConfig::default`]
//! is the factory configuration; boards may override parts of it at build
//! time but nothing is persisted at runtime.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cadences of the control loop, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Sensor sampling and `sensor_data` emission
    pub sensor_period_ms: u32,
    /// Display and local indicator refresh
    pub display_period_ms: u32,
    /// `heartbeat` emission
    pub heartbeat_period_ms: u32,
    /// Sleep between loop iterations
    pub loop_slice_ms: u32,
    /// Upper bound on waiting for the host link at boot
    pub boot_serial_wait_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            sensor_period_ms: 100,
            display_period_ms: 250,
            heartbeat_period_ms: 5000,
            loop_slice_ms: 10,
            boot_serial_wait_ms: 3000,
        }
    }
}

/// Host link watchdog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkConfig {
    /// Silence longer than this marks the host as disconnected
    pub timeout_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

/// Movement classification
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementConfig {
    /// Allowed deviation of the acceleration magnitude from 1 g
    pub deadband_g: f32,
    /// Stillness must last longer than this before motion is cleared
    pub debounce_ms: u32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            deadband_g: 0.15,
            debounce_ms: 500,
        }
    }
}

/// Sensor classification thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SensorConfig {
    /// Knob positions at or above this select lung mode
    pub knob_lung_from: u8,
    /// Knob positions at or above this select calibration mode
    pub knob_calibration_from: u8,
    /// Distances at or above this are invalid (exclusive)
    pub distance_max_mm: u32,
    /// Examination window, inclusive
    pub in_range_min_mm: u32,
    pub in_range_max_mm: u32,
    /// Valid temperature band, both ends exclusive
    pub temperature_min_c: f32,
    pub temperature_max_c: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            knob_lung_from: 33,
            knob_calibration_from: 66,
            distance_max_mm: 2000,
            in_range_min_mm: 20,
            in_range_max_mm: 80,
            temperature_min_c: -40.0,
            temperature_max_c: 125.0,
        }
    }
}

/// Limits applied to host-supplied actuator values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActuatorConfig {
    pub servo_max_deg: u8,
    pub buzzer_min_hz: u16,
    pub buzzer_max_hz: u16,
    pub buzzer_max_ms: u16,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            servo_max_deg: 180,
            buzzer_min_hz: 31,
            buzzer_max_hz: 20_000,
            buzzer_max_ms: 10_000,
        }
    }
}

/// Complete firmware configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FirmwareConfig {
    pub timing: TimingConfig,
    pub link: LinkConfig,
    pub movement: MovementConfig,
    pub sensors: SensorConfig,
    pub actuators: ActuatorConfig,
}

/// Configuration validation errors
///
/// Each variant carries the name of the offending key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A period or timeout is zero
    ZeroPeriod(&'static str),
    /// Lower bound is not below the upper bound
    InvertedRange(&'static str),
    /// Value outside what the hardware can honour
    OutOfBounds(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroPeriod(key) => write!(f, "{} must be greater than zero", key),
            ConfigError::InvertedRange(key) => write!(f, "{} range is empty or inverted", key),
            ConfigError::OutOfBounds(key) => write!(f, "{} is out of bounds", key),
        }
    }
}

impl FirmwareConfig {
    /// Check that the configuration describes a usable device
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        let periods = [
            ("timing.sensor_period_ms", t.sensor_period_ms),
            ("timing.display_period_ms", t.display_period_ms),
            ("timing.heartbeat_period_ms", t.heartbeat_period_ms),
            ("timing.loop_slice_ms", t.loop_slice_ms),
            ("link.timeout_ms", self.link.timeout_ms),
        ];
        for (key, value) in periods {
            if value == 0 {
                return Err(ConfigError::ZeroPeriod(key));
            }
        }

        let m = &self.movement;
        if !m.deadband_g.is_finite() || m.deadband_g <= 0.0 {
            return Err(ConfigError::OutOfBounds("movement.deadband_g"));
        }

        let s = &self.sensors;
        if s.knob_lung_from == 0
            || s.knob_lung_from >= s.knob_calibration_from
            || s.knob_calibration_from > 100
        {
            return Err(ConfigError::InvertedRange("sensors.knob"));
        }
        if s.in_range_min_mm > s.in_range_max_mm || s.in_range_max_mm >= s.distance_max_mm {
            return Err(ConfigError::InvertedRange("sensors.in_range"));
        }
        if !(s.temperature_min_c < s.temperature_max_c) {
            return Err(ConfigError::InvertedRange("sensors.temperature"));
        }

        let a = &self.actuators;
        if a.servo_max_deg == 0 || a.servo_max_deg > 180 {
            return Err(ConfigError::OutOfBounds("actuators.servo_max_deg"));
        }
        if a.buzzer_min_hz == 0 || a.buzzer_min_hz > a.buzzer_max_hz {
            return Err(ConfigError::InvertedRange("actuators.buzzer_hz"));
        }
        if a.buzzer_max_ms == 0 {
            return Err(ConfigError::ZeroPeriod("actuators.buzzer_max_ms"));
        }

        Ok(())
    }
}
