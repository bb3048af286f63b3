//! LSM6DSOX accelerometer
//!
//! Only the accelerometer is used: 104 Hz, ±2 g full scale.

use embedded_hal::i2c::I2c;
use triage_core::traits::{Acceleration, MotionSensor, SensorError};

const ADDR: u8 = 0x6A;

mod reg {
    pub const WHO_AM_I: u8 = 0x0F;
    pub const CTRL1_XL: u8 = 0x10;
    pub const CTRL3_C: u8 = 0x12;
    pub const STATUS: u8 = 0x1E;
    pub const OUTX_L_A: u8 = 0x28;
}

const WHO_AM_I: u8 = 0x6C;

/// ODR 104 Hz, FS ±2 g
const CTRL1_XL_104HZ_2G: u8 = 0x40;

/// Block data update, register auto-increment
const CTRL3_C_BDU_IF_INC: u8 = 0x44;

const STATUS_XLDA: u8 = 0x01;

/// g per LSB at ±2 g
const SENSITIVITY_G: f32 = 0.061 / 1000.0;

/// Movement sensor on the shared bus
pub struct Lsm6dsox<I> {
    i2c: I,
}

impl<I: I2c> Lsm6dsox<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Check the device id and enable the accelerometer
    pub fn init(&mut self) -> Result<(), SensorError> {
        if self.read_reg(reg::WHO_AM_I)? != WHO_AM_I {
            return Err(SensorError::InvalidData);
        }
        self.write_reg(reg::CTRL3_C, CTRL3_C_BDU_IF_INC)?;
        self.write_reg(reg::CTRL1_XL, CTRL1_XL_104HZ_2G)
    }

    fn read_reg(&mut self, register: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(ADDR, &[register], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(buf[0])
    }

    fn write_reg(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(ADDR, &[register, value])
            .map_err(|_| SensorError::Bus)
    }
}

impl<I: I2c> MotionSensor for Lsm6dsox<I> {
    fn available(&mut self) -> bool {
        // A bus error here shows up again on the read
        self.read_reg(reg::STATUS)
            .map(|status| status & STATUS_XLDA != 0)
            .unwrap_or(true)
    }

    fn read_accel(&mut self) -> Result<Acceleration, SensorError> {
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(ADDR, &[reg::OUTX_L_A], &mut buf)
            .map_err(|_| SensorError::Bus)?;

        let axis = |lo: u8, hi: u8| i16::from_le_bytes([lo, hi]) as f32 * SENSITIVITY_G;
        Ok(Acceleration::new(
            axis(buf[0], buf[1]),
            axis(buf[2], buf[3]),
            axis(buf[4], buf[5]),
        ))
    }
}
