//! Typed inbound events from the host
//!
//! These are what the rest of the firmware consumes. Wire strings such as
//! `"SHOWING_RESULTS"` or `"OFF"` never travel past [`crate::decode_line`].

use heapless::String;

/// Maximum length of host-supplied display text (longer text is truncated)
pub const MAX_DISPLAY_TEXT: usize = 64;

/// Host-supplied display text
pub type DisplayText = String<MAX_DISPLAY_TEXT>;

/// Lifecycle states the host may request via `system_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostState {
    Idle,
    Examining,
    ShowingResults,
    Error,
}

// Wire format values
const STATE_IDLE: &str = "IDLE";
const STATE_EXAMINING: &str = "EXAMINING";
const STATE_SHOWING_RESULTS: &str = "SHOWING_RESULTS";
const STATE_ERROR: &str = "ERROR";

impl HostState {
    /// Parse a state from its wire name (case-sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            STATE_IDLE => Some(HostState::Idle),
            STATE_EXAMINING => Some(HostState::Examining),
            STATE_SHOWING_RESULTS => Some(HostState::ShowingResults),
            STATE_ERROR => Some(HostState::Error),
            _ => None,
        }
    }

    /// Wire name of this state
    pub fn name(self) -> &'static str {
        match self {
            HostState::Idle => STATE_IDLE,
            HostState::Examining => STATE_EXAMINING,
            HostState::ShowingResults => STATE_SHOWING_RESULTS,
            HostState::Error => STATE_ERROR,
        }
    }
}

/// Servo position request, in degrees as sent by the host (unclamped)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoCommand {
    pub angle: i32,
}

/// Buzzer request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerCommand {
    /// Play a tone (values unclamped)
    Tone { frequency_hz: i32, duration_ms: i32 },
    /// Stop any tone in progress
    Off,
}

impl BuzzerCommand {
    /// Frequency used when the host omits one
    pub const DEFAULT_FREQUENCY_HZ: i32 = 1000;
    /// Duration used when the host omits one
    pub const DEFAULT_DURATION_MS: i32 = 200;
}

/// Host-owned indicator LED request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorCommand {
    On,
    Off,
}

/// A `control_command` message; every part is optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlCommand {
    /// Progress servo
    pub servo1: Option<ServoCommand>,
    /// Result servo
    pub servo2: Option<ServoCommand>,
    pub buzzer: Option<BuzzerCommand>,
    pub led: Option<IndicatorCommand>,
    pub display_text: Option<DisplayText>,
}

impl ControlCommand {
    /// Returns true if the command requests no actuation at all
    pub fn is_empty(&self) -> bool {
        self.servo1.is_none()
            && self.servo2.is_none()
            && self.buzzer.is_none()
            && self.led.is_none()
            && self.display_text.is_none()
    }
}

/// A successfully decoded inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InboundEvent {
    /// Actuation request from the host
    Control(ControlCommand),
    /// State change request; `None` when the state name is missing or unknown
    SystemStatus(Option<HostState>),
    /// Keepalive
    Heartbeat,
    /// Well-formed message of a type the firmware does not act on
    Unrecognized,
}
