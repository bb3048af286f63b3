//! Line framing for the host protocol.
//!
//! Frame format:
//! - PAYLOAD (1-512 bytes): one UTF-8 JSON object
//! - TERMINATOR (1 byte): `\n` (a preceding `\r` is tolerated and trimmed
//!   by the decoder)
//!
//! The parser is fed one byte at a time from the UART and never blocks: a
//! partial line simply stays buffered until the terminator arrives.

use heapless::Vec;

/// Line terminator
pub const LINE_END: u8 = b'\n';

/// Maximum inbound line length, excluding the terminator
pub const MAX_LINE_LEN: usize = 512;

/// A complete inbound line (terminator stripped)
pub type Line = Vec<u8, MAX_LINE_LEN>;

/// Errors that can occur while assembling lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded [`MAX_LINE_LEN`]; bytes are discarded until the next
    /// terminator
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Accumulating bytes of the current line
    Collecting,
    /// Current line overflowed, skipping to the next terminator
    Discarding,
}

/// Incremental newline framer
#[derive(Debug, Clone)]
pub struct LineParser {
    state: ParseState,
    buffer: Line,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self {
            state: ParseState::Collecting,
            buffer: Vec::new(),
        }
    }

    /// Drop any partially received line
    pub fn reset(&mut self) {
        self.state = ParseState::Collecting;
        self.buffer.clear();
    }

    /// Number of bytes buffered for the line in progress
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a non-empty
    /// line, `Ok(None)` when more bytes are needed, or
    /// `Err(LineError::Overflow)` once when a line grows too long.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        match self.state {
            ParseState::Collecting => {
                if byte == LINE_END {
                    if self.buffer.is_empty() {
                        return Ok(None);
                    }
                    return Ok(Some(core::mem::take(&mut self.buffer)));
                }

                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.state = ParseState::Discarding;
                    return Err(LineError::Overflow);
                }
                Ok(None)
            }
            ParseState::Discarding => {
                if byte == LINE_END {
                    self.state = ParseState::Collecting;
                }
                Ok(None)
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Stops at the first complete line. Returns the number of bytes
    /// consumed together with the result, so the caller can resume with
    /// the remainder.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (usize, Result<Option<Line>, LineError>) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(None) => {}
                other => return (i + 1, other),
            }
        }
        (bytes.len(), Ok(None))
    }
}
