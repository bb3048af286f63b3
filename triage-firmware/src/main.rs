//! Triage Station - Point-of-care triage device firmware
//!
//! Main firmware binary for the RP2040 triage station controller. The
//! board samples its sensors, drives its actuators and reports to the host
//! computer, which runs the diagnostics and decides what the device shows.
//!
//! There is exactly one thread of control: the main task boots the
//! controller and then runs its loop, sleeping one loop slice between
//! iterations.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use triage_core::config::{
    ActuatorConfig, FirmwareConfig, LinkConfig, MovementConfig, SensorConfig, TimingConfig,
};
use triage_core::{Controller, FIRMWARE_VERSION};

mod board;
mod clock;
mod drivers;
mod serial;

// FIRMWARE_CONFIG, generated by build.rs from triage.toml
include!(concat!(env!("OUT_DIR"), "/config.rs"));

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Triage station firmware {} starting...", FIRMWARE_VERSION);

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let peripherals = board::bring_up(p);

    let config = FIRMWARE_CONFIG;
    let loop_slice = Duration::from_millis(config.timing.loop_slice_ms as u64);

    let mut controller = Controller::new(peripherals, config);
    controller.boot(&mut Delay);
    info!("Control loop running");

    loop {
        controller.tick();
        Timer::after(loop_slice).await;
    }
}
