//! Byte-stream transport to the host

/// Errors that can occur on the host link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// Receiver overrun or framing error; bytes were lost
    Overrun,
    /// Transmit path failed
    Write,
}

/// Non-blocking serial port
pub trait SerialPort {
    /// Returns true once the link is usable
    fn is_ready(&mut self) -> bool;

    /// Copy already-received bytes into `buf` without waiting
    ///
    /// Returns `Ok(0)` when nothing is pending.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError>;

    /// Queue all of `bytes` for transmission
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerialError>;
}
