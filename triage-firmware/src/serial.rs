//! Host link over the buffered UART
//!
//! The interrupt handler fills the receive ring; the control loop drains
//! it without waiting.

use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io::{Read, ReadReady, Write};
use triage_core::traits::{SerialError, SerialPort};

/// Line-oriented host link
pub struct UartLink {
    rx: BufferedUartRx,
    tx: BufferedUartTx,
}

impl UartLink {
    pub fn new(rx: BufferedUartRx, tx: BufferedUartTx) -> Self {
        Self { rx, tx }
    }
}

impl SerialPort for UartLink {
    fn is_ready(&mut self) -> bool {
        // A UART has no session; it is usable as soon as it is configured
        true
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        match self.rx.read_ready() {
            Ok(true) => self.rx.read(buf).map_err(|_| SerialError::Overrun),
            Ok(false) => Ok(0),
            Err(_) => Err(SerialError::Overrun),
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        self.tx.write_all(bytes).map_err(|_| SerialError::Write)
    }
}
