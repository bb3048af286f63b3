//! HS3003 temperature and humidity sensor
//!
//! A conversion takes about 35 ms, longer than a loop slice. Each read
//! fetches the result of the conversion triggered by the previous read and
//! then triggers the next one, so the loop never waits on the sensor.

use embedded_hal::i2c::I2c;
use triage_core::traits::{SensorError, TemperatureSensor};

const ADDR: u8 = 0x44;

/// Status bits in the top of the first byte
const STATUS_STALE: u8 = 0b01;

const RAW_MAX: f32 = 16383.0;

/// Thermometer on the shared bus
pub struct Hs3003<I> {
    i2c: I,
}

impl<I: I2c> Hs3003<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Trigger a conversion
    pub fn trigger(&mut self) -> Result<(), SensorError> {
        self.i2c.write(ADDR, &[]).map_err(|_| SensorError::Bus)
    }
}

/// Temperature in °C from the 14-bit raw reading
fn raw_to_celsius(raw: u16) -> f32 {
    raw as f32 * 165.0 / RAW_MAX - 40.0
}

impl<I: I2c> TemperatureSensor for Hs3003<I> {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        // humidity hi, humidity lo, temperature hi, temperature lo
        let mut buf = [0u8; 4];
        self.i2c
            .read(ADDR, &mut buf)
            .map_err(|_| SensorError::Bus)?;
        self.trigger()?;

        if buf[0] >> 6 == STATUS_STALE {
            return Err(SensorError::NotReady);
        }

        let raw = u16::from_be_bytes([buf[2], buf[3]]) >> 2;
        Ok(raw_to_celsius(raw))
    }
}
