//! Actuator control
//!
//! Servos, buzzer and indicator LEDs, driven both by host commands and by
//! local state reactions.

pub mod controller;
pub mod indicator;

pub use controller::{ActuatorController, ActuatorFault, ServoChannel};
pub use indicator::{link_color, state_color, HOST_CHANNEL, LINK_CHANNEL, STATE_CHANNEL};
