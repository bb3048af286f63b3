//! Board-agnostic control logic for the triage station firmware
//!
//! This crate contains everything that does not depend on specific
//! hardware:
//!
//! - Collaborator traits (sensors, actuators, display, serial link, clock)
//! - Sensor sampling and movement stability tracking
//! - Host-driven system state machine
//! - Host link watchdog
//! - Actuator command handling and local indicator policy
//! - Display composition
//! - The cooperative [`Controller`] loop tying it all together
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

#[macro_use]
mod log;

pub mod actuator;
pub mod config;
pub mod controller;
pub mod display;
pub mod link;
pub mod scheduler;
pub mod sensing;
pub mod state;
pub mod traits;

#[cfg(test)]
mod mock;

pub use controller::Controller;

/// Firmware version reported in the `startup` message
pub const FIRMWARE_VERSION: &str = env!("CARGO_PKG_VERSION");
