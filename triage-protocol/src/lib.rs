//! Triage Station Host Protocol
//!
//! This crate defines the serial protocol between the triage station
//! microcontroller and the host computer that runs diagnostic inference.
//! The protocol is deliberately simple: best-effort, unacknowledged,
//! one JSON object per line in each direction.
//!
//! # Protocol Overview
//!
//! ```text
//! host ──► MCU   {"message_type":"control_command","commands":{...}}\n
//!                {"message_type":"system_status","status":{"state":"IDLE"}}\n
//!                {"message_type":"heartbeat"}\n
//!
//! MCU ──► host   {"message_type":"startup","version":"1.0.0"}\n
//!                {"timestamp":1200,"message_type":"sensor_data","data":{...}}\n
//!                {"timestamp":5000,"message_type":"heartbeat","uptime":5000}\n
//! ```
//!
//! String dispatch on `message_type` happens once, in [`decode_line`];
//! everything downstream consumes the typed [`InboundEvent`].

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod events;
pub mod inbound;
pub mod line;
pub mod outbound;

pub use events::{
    BuzzerCommand, ControlCommand, DisplayText, HostState, IndicatorCommand, InboundEvent,
    ServoCommand, MAX_DISPLAY_TEXT,
};
pub use inbound::{decode_line, DecodeError};
pub use line::{LineError, LineParser, MAX_LINE_LEN};
pub use outbound::{
    encode_line, DistanceData, EncodeError, ErrorReportMessage, HeartbeatMessage, KnobData,
    MovementData, OutboundMessage, SensorData, SensorDataMessage, StartupMessage, TemperatureData,
    MAX_OUTBOUND_LEN,
};
