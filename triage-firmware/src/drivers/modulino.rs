//! Modulino I2C nodes: knob, buzzer and pixels
//!
//! Every Modulino node answers a read with one pinstrap byte followed by
//! the payload, and accepts a plain payload on write.

use embedded_hal::i2c::I2c;
use triage_core::traits::{ActuatorError, Buzzer, IndicatorLeds, KnobSensor, Rgb, SensorError};

const KNOB_ADDR: u8 = 0x3A;
const BUZZER_ADDR: u8 = 0x1E;
const PIXELS_ADDR: u8 = 0x36;

/// Number of LEDs on a Modulino Pixels strip
pub const PIXEL_COUNT: usize = 8;

/// Global brightness, 0-31
const PIXEL_BRIGHTNESS: u8 = 8;

/// Rotary encoder knob
///
/// The encoder counts detents; the count is used directly as the 0-100
/// knob position and clamped by the sampler.
pub struct ModulinoKnob<I> {
    i2c: I,
}

impl<I: I2c> ModulinoKnob<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }
}

impl<I: I2c> KnobSensor for ModulinoKnob<I> {
    fn read_position(&mut self) -> Result<i32, SensorError> {
        // pinstrap, count lo, count hi, button
        let mut buf = [0u8; 4];
        self.i2c
            .read(KNOB_ADDR, &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(i16::from_le_bytes([buf[1], buf[2]]) as i32)
    }
}

/// Piezo buzzer; the node times the tone itself
pub struct ModulinoBuzzer<I> {
    i2c: I,
}

impl<I: I2c> ModulinoBuzzer<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    fn write_tone(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<(), ActuatorError> {
        let mut buf = [0u8; 8];
        buf[..4].copy_from_slice(&frequency_hz.to_le_bytes());
        buf[4..].copy_from_slice(&duration_ms.to_le_bytes());
        self.i2c
            .write(BUZZER_ADDR, &buf)
            .map_err(|_| ActuatorError::Bus)
    }
}

impl<I: I2c> Buzzer for ModulinoBuzzer<I> {
    fn tone(&mut self, frequency_hz: u16, duration_ms: u16) -> Result<(), ActuatorError> {
        self.write_tone(frequency_hz as u32, duration_ms as u32)
    }

    fn silence(&mut self) -> Result<(), ActuatorError> {
        self.write_tone(0, 0)
    }
}

/// Strip of eight APA102-style LEDs
///
/// `set` only stages a colour; `show` sends the whole strip.
pub struct ModulinoPixels<I> {
    i2c: I,
    frame: [u8; PIXEL_COUNT * 4],
}

impl<I: I2c> ModulinoPixels<I> {
    pub fn new(i2c: I) -> Self {
        let mut pixels = Self {
            i2c,
            frame: [0; PIXEL_COUNT * 4],
        };
        for channel in 0..PIXEL_COUNT {
            pixels.stage(channel, Rgb::OFF);
        }
        pixels
    }

    fn stage(&mut self, channel: usize, color: Rgb) {
        let word = 0xE0
            | PIXEL_BRIGHTNESS as u32
            | (color.b as u32) << 8
            | (color.g as u32) << 16
            | (color.r as u32) << 24;
        self.frame[channel * 4..channel * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
}

impl<I: I2c> IndicatorLeds for ModulinoPixels<I> {
    fn channels(&self) -> u8 {
        PIXEL_COUNT as u8
    }

    fn set(&mut self, channel: u8, color: Rgb) -> Result<(), ActuatorError> {
        if channel as usize >= PIXEL_COUNT {
            return Err(ActuatorError::Output);
        }
        self.stage(channel as usize, color);
        Ok(())
    }

    fn show(&mut self) -> Result<(), ActuatorError> {
        self.i2c
            .write(PIXELS_ADDR, &self.frame)
            .map_err(|_| ActuatorError::Bus)
    }
}
