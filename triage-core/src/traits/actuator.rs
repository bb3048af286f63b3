//! Actuator accessor traits

/// Errors that can occur while driving an actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Bus transaction failed
    Bus,
    /// PWM or timer could not be configured for the request
    Output,
}

/// 24-bit indicator colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const AMBER: Rgb = Rgb::new(255, 120, 0);
    pub const ORANGE: Rgb = Rgb::new(255, 60, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Hobby servo
pub trait ServoOutput {
    /// Move to an absolute angle in degrees (0..=180)
    fn write_angle(&mut self, degrees: u8) -> Result<(), ActuatorError>;
}

/// Piezo buzzer
pub trait Buzzer {
    /// Play a tone for the given duration; returns immediately
    fn tone(&mut self, frequency_hz: u16, duration_ms: u16) -> Result<(), ActuatorError>;

    /// Stop any tone in progress
    fn silence(&mut self) -> Result<(), ActuatorError>;
}

/// Addressable indicator LEDs
///
/// `set` stages a colour; nothing is visible until `show`.
pub trait IndicatorLeds {
    /// Number of channels on the strip
    fn channels(&self) -> u8;

    fn set(&mut self, channel: u8, color: Rgb) -> Result<(), ActuatorError>;

    fn show(&mut self) -> Result<(), ActuatorError>;
}
