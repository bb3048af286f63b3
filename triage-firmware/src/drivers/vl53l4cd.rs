//! VL53L4CD time-of-flight distance sensor
//!
//! Runs in continuous ranging mode with the factory timing budget; reads
//! never wait for a measurement.

use embedded_hal::i2c::I2c;
use triage_core::traits::{DistanceSensor, SensorError};

const ADDR: u8 = 0x29;

/// 16-bit register map
mod reg {
    pub const GPIO_HV_MUX_CTRL: u16 = 0x0030;
    pub const GPIO_TIO_HV_STATUS: u16 = 0x0031;
    pub const SYSTEM_INTERRUPT_CLEAR: u16 = 0x0086;
    pub const SYSTEM_START: u16 = 0x0087;
    pub const RESULT_RANGE_STATUS: u16 = 0x0089;
    pub const RESULT_DISTANCE: u16 = 0x0096;
    pub const MODEL_ID: u16 = 0x010F;
}

const MODEL_ID: u16 = 0xEBAA;
const START_CONTINUOUS: u8 = 0x40;

/// Raw range status of a valid measurement
const STATUS_VALID: u8 = 9;

/// Distance sensor on the shared bus
pub struct Vl53l4cd<I> {
    i2c: I,
    ranging: bool,
}

impl<I: I2c> Vl53l4cd<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            ranging: false,
        }
    }

    /// Check the model id and start continuous ranging
    pub fn start(&mut self) -> Result<(), SensorError> {
        let id = self.read_u16(reg::MODEL_ID)?;
        if id != MODEL_ID {
            return Err(SensorError::InvalidData);
        }

        self.write_u8(reg::SYSTEM_INTERRUPT_CLEAR, 0x01)?;
        self.write_u8(reg::SYSTEM_START, START_CONTINUOUS)?;
        self.ranging = true;
        Ok(())
    }

    fn data_ready(&mut self) -> Result<bool, SensorError> {
        // Interrupt polarity decides which level of the status bit means ready
        let active_high = self.read_u8(reg::GPIO_HV_MUX_CTRL)? & 0x10 == 0;
        let status = self.read_u8(reg::GPIO_TIO_HV_STATUS)? & 0x01 == 1;
        Ok(status == active_high)
    }

    fn read_u8(&mut self, register: u16) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(ADDR, &register.to_be_bytes(), &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(buf[0])
    }

    fn read_u16(&mut self, register: u16) -> Result<u16, SensorError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(ADDR, &register.to_be_bytes(), &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn write_u8(&mut self, register: u16, value: u8) -> Result<(), SensorError> {
        let [hi, lo] = register.to_be_bytes();
        self.i2c
            .write(ADDR, &[hi, lo, value])
            .map_err(|_| SensorError::Bus)
    }
}

impl<I: I2c> DistanceSensor for Vl53l4cd<I> {
    fn read_distance_mm(&mut self) -> Result<i32, SensorError> {
        if !self.ranging {
            return Err(SensorError::NotReady);
        }
        if !self.data_ready()? {
            return Err(SensorError::NotReady);
        }

        let status = self.read_u8(reg::RESULT_RANGE_STATUS)? & 0x1F;
        let distance = self.read_u16(reg::RESULT_DISTANCE)?;
        self.write_u8(reg::SYSTEM_INTERRUPT_CLEAR, 0x01)?;

        if status != STATUS_VALID {
            return Err(SensorError::InvalidData);
        }
        Ok(distance as i32)
    }
}
