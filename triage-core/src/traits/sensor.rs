//! Sensor accessor traits
//!
//! Each trait wraps one physical sensor behind a synchronous read. Reads
//! may fail; the sampler masks failures with the last known value.

/// Errors that can occur while reading a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed (NACK, arbitration loss, timeout)
    Bus,
    /// Device has no fresh measurement yet; the sampler keeps the last value
    NotReady,
    /// Device answered with data that cannot be a measurement
    InvalidData,
}

/// Acceleration vector in units of g
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Acceleration {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean magnitude
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}

/// Rotary knob used as the mode selector
pub trait KnobSensor {
    /// Read the knob position, nominally 0..=100
    ///
    /// Out-of-range values are tolerated and clamped by the caller.
    fn read_position(&mut self) -> Result<i32, SensorError>;
}

/// Time-of-flight distance sensor
pub trait DistanceSensor {
    /// Read the distance to the target in millimetres
    ///
    /// Negative values are tolerated and clamped to zero by the caller.
    fn read_distance_mm(&mut self) -> Result<i32, SensorError>;
}

/// Accelerometer used for movement detection
pub trait MotionSensor {
    /// Returns true if a new sample is ready to be read
    fn available(&mut self) -> bool;

    /// Read the latest acceleration sample
    fn read_accel(&mut self) -> Result<Acceleration, SensorError>;
}

/// Ambient/skin temperature sensor
pub trait TemperatureSensor {
    /// Read the current temperature in degrees Celsius
    fn read_celsius(&mut self) -> Result<f32, SensorError>;
}
