//! Inbound (host → MCU) message decoding
//!
//! The wire records below mirror the JSON the host sends, with every field
//! optional. They are borrowed straight out of the line buffer and turned
//! into an owned [`InboundEvent`] before the buffer is reused.
//!
//! Payloads are accepted either at the top level
//! (`{"message_type":"system_status","status":{..}}`) or nested under
//! `data` the way the host library's message helper wraps them. The
//! top-level copy wins when both are present.

use serde::Deserialize;

use crate::events::{
    BuzzerCommand, ControlCommand, DisplayText, HostState, IndicatorCommand, InboundEvent,
    ServoCommand,
};

// Message type names
const TYPE_CONTROL_COMMAND: &str = "control_command";
const TYPE_SYSTEM_STATUS: &str = "system_status";
const TYPE_HEARTBEAT: &str = "heartbeat";

// On/off switch values used by buzzer and led commands
const SWITCH_ON: &str = "ON";
const SWITCH_OFF: &str = "OFF";

/// Errors that can occur while decoding a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Line was empty after trimming whitespace
    Empty,
    /// Line is not a JSON object of the expected shape
    Malformed,
}

#[derive(Deserialize)]
struct Envelope<'a> {
    #[serde(borrow)]
    message_type: Option<&'a str>,
    #[serde(borrow)]
    commands: Option<WireCommands<'a>>,
    #[serde(borrow)]
    status: Option<WireStatus<'a>>,
    #[serde(borrow)]
    data: Option<WirePayload<'a>>,
}

#[derive(Deserialize)]
struct WirePayload<'a> {
    #[serde(borrow)]
    commands: Option<WireCommands<'a>>,
    #[serde(borrow)]
    status: Option<WireStatus<'a>>,
}

#[derive(Deserialize)]
struct WireStatus<'a> {
    #[serde(borrow)]
    state: Option<&'a str>,
}

#[derive(Deserialize)]
struct WireCommands<'a> {
    servo1: Option<WireServo>,
    servo2: Option<WireServo>,
    #[serde(borrow)]
    buzzer: Option<WireBuzzer<'a>>,
    #[serde(borrow)]
    display: Option<WireDisplay<'a>>,
    #[serde(borrow)]
    led: Option<WireLed<'a>>,
}

#[derive(Deserialize)]
struct WireServo {
    angle: Option<f32>,
}

#[derive(Deserialize)]
struct WireBuzzer<'a> {
    #[serde(borrow)]
    state: Option<&'a str>,
    frequency: Option<f32>,
    duration: Option<f32>,
}

#[derive(Deserialize)]
struct WireDisplay<'a> {
    #[serde(borrow)]
    text: Option<&'a str>,
}

#[derive(Deserialize)]
struct WireLed<'a> {
    #[serde(borrow)]
    state: Option<&'a str>,
}

/// Decode one line (terminator already stripped) into a typed event
///
/// Leading and trailing ASCII whitespace, including a stray `\r`, is
/// ignored. Unknown fields and unknown message types are tolerated; only
/// structurally invalid JSON is an error.
pub fn decode_line(line: &[u8]) -> Result<InboundEvent, DecodeError> {
    let trimmed = line.trim_ascii();
    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }

    let (envelope, _) = serde_json_core::from_slice::<Envelope<'_>>(trimmed)
        .map_err(|_| DecodeError::Malformed)?;

    Ok(envelope.into_event())
}

impl<'a> Envelope<'a> {
    fn into_event(self) -> InboundEvent {
        let Envelope {
            message_type,
            commands,
            status,
            data,
        } = self;

        match message_type {
            Some(TYPE_CONTROL_COMMAND) => {
                let commands = commands.or_else(|| data.and_then(|d| d.commands));
                InboundEvent::Control(
                    commands
                        .map(WireCommands::into_command)
                        .unwrap_or_default(),
                )
            }
            Some(TYPE_SYSTEM_STATUS) => {
                let status = status.or_else(|| data.and_then(|d| d.status));
                InboundEvent::SystemStatus(
                    status
                        .and_then(|s| s.state)
                        .and_then(HostState::from_name),
                )
            }
            Some(TYPE_HEARTBEAT) => InboundEvent::Heartbeat,
            _ => InboundEvent::Unrecognized,
        }
    }
}

impl<'a> WireCommands<'a> {
    fn into_command(self) -> ControlCommand {
        ControlCommand {
            servo1: self.servo1.and_then(WireServo::into_command),
            servo2: self.servo2.and_then(WireServo::into_command),
            buzzer: self.buzzer.and_then(WireBuzzer::into_command),
            led: self.led.and_then(|led| match led.state {
                Some(SWITCH_ON) => Some(IndicatorCommand::On),
                Some(SWITCH_OFF) => Some(IndicatorCommand::Off),
                _ => None,
            }),
            display_text: self.display.and_then(|d| d.text).map(truncate_text),
        }
    }
}

impl WireServo {
    fn into_command(self) -> Option<ServoCommand> {
        self.angle.map(|angle| ServoCommand {
            angle: angle as i32,
        })
    }
}

impl<'a> WireBuzzer<'a> {
    fn into_command(self) -> Option<BuzzerCommand> {
        let tone = BuzzerCommand::Tone {
            frequency_hz: self
                .frequency
                .map_or(BuzzerCommand::DEFAULT_FREQUENCY_HZ, |f| f as i32),
            duration_ms: self
                .duration
                .map_or(BuzzerCommand::DEFAULT_DURATION_MS, |d| d as i32),
        };

        match self.state {
            Some(SWITCH_OFF) => Some(BuzzerCommand::Off),
            Some(SWITCH_ON) => Some(tone),
            None if self.frequency.is_some() => Some(tone),
            _ => None,
        }
    }
}

/// Copy as many whole characters as fit
fn truncate_text(text: &str) -> DisplayText {
    let mut out = DisplayText::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MAX_DISPLAY_TEXT;
    use proptest::prelude::*;

    fn control(line: &str) -> ControlCommand {
        match decode_line(line.as_bytes()) {
            Ok(InboundEvent::Control(cmd)) => cmd,
            other => panic!("expected control command, got {:?}", other),
        }
    }

    #[test]
    fn test_heartbeat() {
        assert_eq!(
            decode_line(b"{\"message_type\":\"heartbeat\"}"),
            Ok(InboundEvent::Heartbeat)
        );
    }

    #[test]
    fn test_system_status_states() {
        let cases = [
            ("IDLE", Some(HostState::Idle)),
            ("EXAMINING", Some(HostState::Examining)),
            ("SHOWING_RESULTS", Some(HostState::ShowingResults)),
            ("ERROR", Some(HostState::Error)),
            ("DANCING", None),
        ];

        for (name, expected) in cases {
            let line = format!(
                "{{\"message_type\":\"system_status\",\"status\":{{\"state\":\"{}\"}}}}",
                name
            );
            assert_eq!(
                decode_line(line.as_bytes()),
                Ok(InboundEvent::SystemStatus(expected))
            );
        }
    }

    #[test]
    fn test_system_status_without_state() {
        assert_eq!(
            decode_line(b"{\"message_type\":\"system_status\"}"),
            Ok(InboundEvent::SystemStatus(None))
        );
    }

    #[test]
    fn test_status_nested_under_data() {
        let line = b"{\"timestamp\":\"2024-01-01T00:00:00\",\"message_type\":\"system_status\",\
                     \"data\":{\"status\":{\"state\":\"EXAMINING\"}}}";
        assert_eq!(
            decode_line(line),
            Ok(InboundEvent::SystemStatus(Some(HostState::Examining)))
        );
    }

    #[test]
    fn test_top_level_payload_wins_over_data() {
        let line = b"{\"message_type\":\"system_status\",\"status\":{\"state\":\"ERROR\"},\
                     \"data\":{\"status\":{\"state\":\"IDLE\"}}}";
        assert_eq!(
            decode_line(line),
            Ok(InboundEvent::SystemStatus(Some(HostState::Error)))
        );
    }

    #[test]
    fn test_full_control_command() {
        let cmd = control(
            "{\"message_type\":\"control_command\",\"commands\":{\
             \"servo1\":{\"angle\":45},\"servo2\":{\"angle\":120.0},\
             \"buzzer\":{\"state\":\"ON\",\"frequency\":440,\"duration\":50},\
             \"display\":{\"text\":\"Heart: normal\"},\
             \"led\":{\"state\":\"ON\",\"pattern\":\"solid\"}}}",
        );

        assert_eq!(cmd.servo1, Some(ServoCommand { angle: 45 }));
        assert_eq!(cmd.servo2, Some(ServoCommand { angle: 120 }));
        assert_eq!(
            cmd.buzzer,
            Some(BuzzerCommand::Tone {
                frequency_hz: 440,
                duration_ms: 50
            })
        );
        assert_eq!(cmd.led, Some(IndicatorCommand::On));
        assert_eq!(cmd.display_text.as_deref(), Some("Heart: normal"));
    }

    #[test]
    fn test_absent_keys_produce_no_actuation() {
        let cmd = control("{\"message_type\":\"control_command\",\"commands\":{}}");
        assert!(cmd.is_empty());

        let cmd = control("{\"message_type\":\"control_command\"}");
        assert!(cmd.is_empty());

        let cmd = control(
            "{\"message_type\":\"control_command\",\"commands\":{\"servo1\":{}}}",
        );
        assert!(cmd.is_empty());
    }

    #[test]
    fn test_buzzer_variants() {
        let cmd = control(
            "{\"message_type\":\"control_command\",\"commands\":{\"buzzer\":{\"state\":\"OFF\"}}}",
        );
        assert_eq!(cmd.buzzer, Some(BuzzerCommand::Off));

        let cmd = control(
            "{\"message_type\":\"control_command\",\"commands\":{\"buzzer\":{\"state\":\"ON\"}}}",
        );
        assert_eq!(
            cmd.buzzer,
            Some(BuzzerCommand::Tone {
                frequency_hz: BuzzerCommand::DEFAULT_FREQUENCY_HZ,
                duration_ms: BuzzerCommand::DEFAULT_DURATION_MS,
            })
        );

        let cmd = control(
            "{\"message_type\":\"control_command\",\"commands\":{\"buzzer\":{\"frequency\":880}}}",
        );
        assert_eq!(
            cmd.buzzer,
            Some(BuzzerCommand::Tone {
                frequency_hz: 880,
                duration_ms: BuzzerCommand::DEFAULT_DURATION_MS,
            })
        );

        let cmd = control(
            "{\"message_type\":\"control_command\",\"commands\":{\"buzzer\":{\"state\":\"LOUD\"}}}",
        );
        assert_eq!(cmd.buzzer, None);
    }

    #[test]
    fn test_control_nested_under_data() {
        let cmd = control(
            "{\"message_type\":\"control_command\",\"data\":{\"commands\":{\"led\":{\"state\":\"OFF\"}}}}",
        );
        assert_eq!(cmd.led, Some(IndicatorCommand::Off));
    }

    #[test]
    fn test_long_display_text_truncated() {
        let text = "x".repeat(MAX_DISPLAY_TEXT + 20);
        let line = format!(
            "{{\"message_type\":\"control_command\",\"commands\":{{\"display\":{{\"text\":\"{}\"}}}}}}",
            text
        );
        let cmd = control(&line);
        assert_eq!(cmd.display_text.map(|t| t.len()), Some(MAX_DISPLAY_TEXT));
    }

    fn display_line(text: &str) -> std::string::String {
        format!(
            "{{\"message_type\":\"control_command\",\"commands\":{{\"display\":{{\"text\":\"{}\"}}}}}}",
            text
        )
    }

    #[test]
    fn test_multibyte_display_text() {
        let cmd = control(&display_line("37°C"));
        assert_eq!(cmd.display_text.as_deref(), Some("37°C"));

        let cmd = control(&display_line("Température élevée à vérifier"));
        assert_eq!(cmd.display_text.as_deref(), Some("Température élevée à vérifier"));
    }

    #[test]
    fn test_multibyte_display_text_truncated_on_char_boundary() {
        // 63 ASCII bytes then a two-byte '°' that would end at byte 65
        let text = format!("{}°C", "x".repeat(MAX_DISPLAY_TEXT - 1));
        let cmd = control(&display_line(&text));
        let shown = cmd.display_text.unwrap();
        assert_eq!(shown.len(), MAX_DISPLAY_TEXT - 1);
        assert!(shown.chars().all(|c| c == 'x'));

        // 62 ASCII bytes then '°' ends exactly at the limit
        let text = format!("{}°C", "x".repeat(MAX_DISPLAY_TEXT - 2));
        let shown = control(&display_line(&text)).display_text.unwrap();
        assert_eq!(shown.len(), MAX_DISPLAY_TEXT);
        assert!(shown.ends_with('°'));

        let text = "é".repeat(MAX_DISPLAY_TEXT);
        let shown = control(&display_line(&text)).display_text.unwrap();
        assert_eq!(shown.as_str(), "é".repeat(MAX_DISPLAY_TEXT / 2));
    }

    #[test]
    fn test_unknown_message_type() {
        assert_eq!(
            decode_line(b"{\"message_type\":\"calibration_cmd\",\"data\":{\"step\":1}}"),
            Ok(InboundEvent::Unrecognized)
        );
        assert_eq!(decode_line(b"{}"), Ok(InboundEvent::Unrecognized));
    }

    #[test]
    fn test_whitespace_and_carriage_return_trimmed() {
        assert_eq!(
            decode_line(b"  {\"message_type\":\"heartbeat\"}\r"),
            Ok(InboundEvent::Heartbeat)
        );
        assert_eq!(decode_line(b" \r"), Err(DecodeError::Empty));
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!(
            decode_line(b"{\"message_type\":\"con"),
            Err(DecodeError::Malformed)
        );
        assert_eq!(decode_line(b"not json"), Err(DecodeError::Malformed));
        assert_eq!(
            decode_line(b"{\"message_type\":42}"),
            Err(DecodeError::Malformed)
        );
        assert_eq!(
            decode_line(
                b"{\"message_type\":\"control_command\",\"commands\":{\"servo1\":{\"angle\":\"up\"}}}"
            ),
            Err(DecodeError::Malformed)
        );
    }

    proptest! {
        #[test]
        fn prop_arbitrary_bytes_never_panic(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            let _ = decode_line(&data);
        }

        #[test]
        fn prop_truncated_messages_never_panic(cut in 0usize..96) {
            let full: &[u8] = b"{\"message_type\":\"control_command\",\"commands\":{\"servo1\":{\"angle\":90},\"buzzer\":{\"state\":\"ON\"}}}";
            let cut = cut.min(full.len());
            let _ = decode_line(&full[..cut]);
        }
    }
}
