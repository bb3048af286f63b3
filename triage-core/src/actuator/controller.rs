//! Actuator command surface
//!
//! Holds the servo, buzzer and indicator drivers and applies both host
//! commands and local reactions to them. Nothing is remembered between
//! calls; host values are clamped into the configured limits before they
//! reach the hardware.

use triage_protocol::{BuzzerCommand, ControlCommand, IndicatorCommand, ServoCommand};

use super::indicator::{HOST_CHANNEL, LINK_CHANNEL, STATE_CHANNEL};
use crate::config::ActuatorConfig;
use crate::traits::{ActuatorError, Buzzer, IndicatorLeds, Rgb, ServoOutput};

/// Which servo to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoChannel {
    /// `servo1`, examination progress
    Progress,
    /// `servo2`, triage result pointer
    Result,
}

impl ServoChannel {
    pub fn name(self) -> &'static str {
        match self {
            ServoChannel::Progress => "servo1",
            ServoChannel::Result => "servo2",
        }
    }
}

/// A failed actuation, naming the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorFault {
    pub actuator: &'static str,
    pub error: ActuatorError,
}

/// Clamped tone parameters; `None` means silence
pub fn clamp_tone(
    frequency_hz: i32,
    duration_ms: i32,
    limits: &ActuatorConfig,
) -> Option<(u16, u16)> {
    if frequency_hz <= 0 {
        return None;
    }

    let frequency = frequency_hz.clamp(limits.buzzer_min_hz as i32, limits.buzzer_max_hz as i32);
    let duration = duration_ms.clamp(1, limits.buzzer_max_ms as i32);
    Some((frequency as u16, duration as u16))
}

/// Servo angle clamped into `0..=servo_max_deg`
pub fn clamp_angle(angle: i32, limits: &ActuatorConfig) -> u8 {
    angle.clamp(0, limits.servo_max_deg as i32) as u8
}

/// Actuator controller
pub struct ActuatorController<S, Z, L> {
    progress_servo: S,
    result_servo: S,
    buzzer: Z,
    indicator: L,
    limits: ActuatorConfig,
}

impl<S, Z, L> ActuatorController<S, Z, L>
where
    S: ServoOutput,
    Z: Buzzer,
    L: IndicatorLeds,
{
    pub fn new(
        progress_servo: S,
        result_servo: S,
        buzzer: Z,
        indicator: L,
        limits: ActuatorConfig,
    ) -> Self {
        Self {
            progress_servo,
            result_servo,
            buzzer,
            indicator,
            limits,
        }
    }

    /// Move a servo; the angle is clamped to the configured range
    pub fn set_servo(&mut self, which: ServoChannel, angle: i32) -> Result<(), ActuatorError> {
        let degrees = clamp_angle(angle, &self.limits);
        match which {
            ServoChannel::Progress => self.progress_servo.write_angle(degrees),
            ServoChannel::Result => self.result_servo.write_angle(degrees),
        }
    }

    /// Play a tone; a non-positive frequency silences the buzzer
    pub fn buzz(&mut self, frequency_hz: i32, duration_ms: i32) -> Result<(), ActuatorError> {
        match clamp_tone(frequency_hz, duration_ms, &self.limits) {
            Some((frequency, duration)) => self.buzzer.tone(frequency, duration),
            None => self.buzzer.silence(),
        }
    }

    pub fn silence(&mut self) -> Result<(), ActuatorError> {
        self.buzzer.silence()
    }

    /// Set one indicator channel and latch it
    ///
    /// Channels the strip does not have are ignored.
    pub fn set_indicator_color(&mut self, channel: u8, color: Rgb) -> Result<(), ActuatorError> {
        if channel >= self.indicator.channels() {
            log_debug!("indicator channel {=u8} not present", channel);
            return Ok(());
        }

        self.indicator.set(channel, color)?;
        self.indicator.show()
    }

    /// Refresh the locally owned state and link channels
    pub fn show_local(&mut self, state: Rgb, link: Rgb) -> Result<(), ActuatorError> {
        self.indicator.set(STATE_CHANNEL, state)?;
        self.indicator.set(LINK_CHANNEL, link)?;
        self.indicator.show()
    }

    /// Apply a host `control_command`
    ///
    /// Every requested actuation is attempted; the first failure is
    /// returned after all of them ran.
    pub fn apply(&mut self, command: &ControlCommand) -> Result<(), ActuatorFault> {
        let mut first_fault = None;
        let mut note = |actuator: &'static str, result: Result<(), ActuatorError>| {
            if let Err(error) = result {
                log_warn!("{} command failed: {}", actuator, error);
                first_fault.get_or_insert(ActuatorFault { actuator, error });
            }
        };

        if let Some(ServoCommand { angle }) = command.servo1 {
            note(
                ServoChannel::Progress.name(),
                self.set_servo(ServoChannel::Progress, angle),
            );
        }
        if let Some(ServoCommand { angle }) = command.servo2 {
            note(
                ServoChannel::Result.name(),
                self.set_servo(ServoChannel::Result, angle),
            );
        }

        match command.buzzer {
            Some(BuzzerCommand::Tone {
                frequency_hz,
                duration_ms,
            }) => note("buzzer", self.buzz(frequency_hz, duration_ms)),
            Some(BuzzerCommand::Off) => note("buzzer", self.silence()),
            None => {}
        }

        if let Some(led) = command.led {
            let color = match led {
                IndicatorCommand::On => Rgb::WHITE,
                IndicatorCommand::Off => Rgb::OFF,
            };
            note("led", self.set_indicator_color(HOST_CHANNEL, color));
        }

        first_fault.map_or(Ok(()), Err)
    }
}
