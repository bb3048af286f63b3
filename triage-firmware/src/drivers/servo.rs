//! Hobby servo on a 50 Hz PWM channel

use embedded_hal::pwm::SetDutyCycle;
use triage_core::traits::{ActuatorError, ServoOutput};

/// PWM period at 50 Hz
pub const PERIOD_US: u16 = 20_000;

/// Pulse width at 0°
const MIN_PULSE_US: u16 = 500;

/// Pulse width at 180°
const MAX_PULSE_US: u16 = 2_500;

/// Pulse width for `degrees`, saturating at 180°
pub fn pulse_width_us(degrees: u8) -> u16 {
    let degrees = degrees.min(180) as u32;
    let span = (MAX_PULSE_US - MIN_PULSE_US) as u32;
    MIN_PULSE_US + (degrees * span / 180) as u16
}

/// Servo driven through any duty-cycle output
pub struct PwmServo<P> {
    pwm: P,
}

impl<P: SetDutyCycle> PwmServo<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm }
    }
}

impl<P: SetDutyCycle> ServoOutput for PwmServo<P> {
    fn write_angle(&mut self, degrees: u8) -> Result<(), ActuatorError> {
        self.pwm
            .set_duty_cycle_fraction(pulse_width_us(degrees), PERIOD_US)
            .map_err(|_| ActuatorError::Output)
    }
}
