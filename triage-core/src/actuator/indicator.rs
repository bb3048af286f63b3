//! Local indicator policy
//!
//! | Channel | Owner | Meaning                                   |
//! |---------|-------|-------------------------------------------|
//! | 0       | local | system state (EXAMINING pulses at 2 Hz)   |
//! | 1       | local | host link                                 |
//! | 2       | host  | `led` control command                     |

use crate::link::LinkStatus;
use crate::state::SystemState;
use crate::traits::Rgb;

pub const STATE_CHANNEL: u8 = 0;
pub const LINK_CHANNEL: u8 = 1;
pub const HOST_CHANNEL: u8 = 2;

/// Colour of the state channel; `pulse_on` is the current half of the pulse
pub fn state_color(state: SystemState, pulse_on: bool) -> Rgb {
    match state {
        SystemState::Initializing => Rgb::AMBER,
        SystemState::Idle => Rgb::GREEN,
        SystemState::Examining if pulse_on => Rgb::BLUE,
        SystemState::Examining => Rgb::OFF,
        SystemState::Results => Rgb::WHITE,
        SystemState::Error => Rgb::RED,
    }
}

/// Colour of the link channel
pub fn link_color(status: LinkStatus) -> Rgb {
    match status {
        LinkStatus::NeverConnected => Rgb::OFF,
        LinkStatus::Connected => Rgb::GREEN,
        LinkStatus::Lost => Rgb::ORANGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examining_pulses() {
        assert_eq!(state_color(SystemState::Examining, true), Rgb::BLUE);
        assert_eq!(state_color(SystemState::Examining, false), Rgb::OFF);
        assert_eq!(state_color(SystemState::Idle, false), Rgb::GREEN);
    }

    #[test]
    fn test_lost_link_is_distinct() {
        let lost = link_color(LinkStatus::Lost);
        assert_ne!(lost, link_color(LinkStatus::Connected));
        assert_ne!(lost, link_color(LinkStatus::NeverConnected));
    }
}
