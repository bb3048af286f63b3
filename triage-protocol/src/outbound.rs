//! Outbound (MCU → host) messages
//!
//! Each record serializes to one JSON object with a fixed field layout;
//! [`encode_line`] appends the line terminator.

use serde::Serialize;

use crate::line::LINE_END;

/// Buffer size that fits the largest outbound message plus terminator
pub const MAX_OUTBOUND_LEN: usize = 384;

const TYPE_SENSOR_DATA: &str = "sensor_data";
const TYPE_HEARTBEAT: &str = "heartbeat";
const TYPE_STARTUP: &str = "startup";
const TYPE_ERROR_REPORT: &str = "error_report";

/// Errors that can occur while encoding a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Output buffer too small for the message and its terminator
    BufferFull,
}

/// Knob section of `sensor_data`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KnobData {
    pub raw_value: u8,
    /// 0 = heart, 1 = lung, 2 = calibration
    pub mode: u8,
    pub voltage: f32,
}

/// Distance section of `sensor_data`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DistanceData {
    pub value_mm: u32,
    pub value_cm: f32,
    pub valid: bool,
    pub in_range: bool,
}

/// Movement section of `sensor_data`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MovementData {
    pub detected: bool,
    pub stable_duration: u32,
}

/// Temperature section of `sensor_data`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureData {
    pub celsius: f32,
    pub valid: bool,
}

/// Payload of a `sensor_data` message
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorData {
    pub knob: KnobData,
    pub distance: DistanceData,
    pub movement: MovementData,
    pub temperature: TemperatureData,
}

/// `{"timestamp":..,"message_type":"sensor_data","data":{..}}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorDataMessage {
    timestamp: u32,
    message_type: &'static str,
    data: SensorData,
}

impl SensorDataMessage {
    pub fn new(timestamp: u32, data: SensorData) -> Self {
        Self {
            timestamp,
            message_type: TYPE_SENSOR_DATA,
            data,
        }
    }
}

/// `{"timestamp":..,"message_type":"heartbeat","uptime":..}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeartbeatMessage {
    timestamp: u32,
    message_type: &'static str,
    uptime: u32,
}

impl HeartbeatMessage {
    pub fn new(timestamp: u32, uptime: u32) -> Self {
        Self {
            timestamp,
            message_type: TYPE_HEARTBEAT,
            uptime,
        }
    }
}

/// `{"message_type":"startup","version":"X.Y.Z"}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StartupMessage<'a> {
    message_type: &'static str,
    version: &'a str,
}

impl<'a> StartupMessage<'a> {
    pub fn new(version: &'a str) -> Self {
        Self {
            message_type: TYPE_STARTUP,
            version,
        }
    }
}

/// Category of a reported fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    SensorFailure,
    ActuatorFailure,
}

/// Payload of an `error_report` message
///
/// Exactly one of `sensor` / `actuator` is present, matching `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorReport<'a> {
    #[serde(rename = "type")]
    pub kind: FaultKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actuator: Option<&'a str>,
    pub message: &'a str,
}

/// `{"timestamp":..,"message_type":"error_report","data":{..}}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorReportMessage<'a> {
    timestamp: u32,
    message_type: &'static str,
    data: ErrorReport<'a>,
}

impl<'a> ErrorReportMessage<'a> {
    /// A sensor started failing reads
    pub fn sensor_failure(timestamp: u32, sensor: &'a str, message: &'a str) -> Self {
        Self::new(
            timestamp,
            ErrorReport {
                kind: FaultKind::SensorFailure,
                sensor: Some(sensor),
                actuator: None,
                message,
            },
        )
    }

    /// An output device (display, servo, buzzer, LEDs) failed
    pub fn actuator_failure(timestamp: u32, actuator: &'a str, message: &'a str) -> Self {
        Self::new(
            timestamp,
            ErrorReport {
                kind: FaultKind::ActuatorFailure,
                sensor: None,
                actuator: Some(actuator),
                message,
            },
        )
    }

    fn new(timestamp: u32, data: ErrorReport<'a>) -> Self {
        Self {
            timestamp,
            message_type: TYPE_ERROR_REPORT,
            data,
        }
    }
}

/// A message the MCU sends to the host
pub trait OutboundMessage: Serialize {}

impl OutboundMessage for SensorDataMessage {}
impl OutboundMessage for HeartbeatMessage {}
impl OutboundMessage for StartupMessage<'_> {}
impl OutboundMessage for ErrorReportMessage<'_> {}

/// Serialize `message` into `buf` followed by the line terminator
///
/// Returns the number of bytes written, terminator included.
pub fn encode_line<T: OutboundMessage>(message: &T, buf: &mut [u8]) -> Result<usize, EncodeError> {
    let len = serde_json_core::to_slice(message, buf).map_err(|_| EncodeError::BufferFull)?;
    let end = buf.get_mut(len).ok_or(EncodeError::BufferFull)?;
    *end = LINE_END;
    Ok(len + 1)
}
