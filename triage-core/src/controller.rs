//! Control loop
//!
//! [`Controller`] owns every collaborator and all runtime state. The
//! firmware calls [`Controller::boot`] once and then [`Controller::tick`]
//! forever, sleeping `timing.loop_slice_ms` in between. Each tick:
//!
//! 1. polls the host link for at most one complete line
//! 2. checks the link watchdog
//! 3. samples sensors and emits `sensor_data` when the sensor timer fires
//! 4. refreshes indicators and the display when the display timer fires
//! 5. emits `heartbeat` when the heartbeat timer fires
//!
//! Nothing in a tick blocks; collaborator failures are logged and masked.

use embedded_hal::delay::DelayNs;
use triage_protocol::{
    decode_line, encode_line, ControlCommand, DisplayText, ErrorReportMessage, HeartbeatMessage,
    InboundEvent, LineError, LineParser, OutboundMessage, SensorDataMessage, StartupMessage,
    MAX_LINE_LEN, MAX_OUTBOUND_LEN,
};

use crate::actuator::{link_color, state_color, ActuatorController};
use crate::config::FirmwareConfig;
use crate::display::{DisplayPresenter, DisplayView};
use crate::link::{CommunicationHealth, CommunicationHealthMonitor, LinkEvent};
use crate::scheduler::PeriodicTimer;
use crate::sensing::{SensorSampler, SensorSet, SensorSnapshot};
use crate::state::{SystemState, SystemStateMachine};
use crate::traits::{Board, Clock, DisplayDriver, Peripherals, SensorError, SerialPort};
use crate::FIRMWARE_VERSION;

/// Warning chirp when the patient moves during an examination
const MOVEMENT_CHIRP_HZ: i32 = 2000;
const MOVEMENT_CHIRP_MS: i32 = 80;

/// Bytes pulled from the transport per poll
const RX_CHUNK: usize = MAX_LINE_LEN;

/// Control loop state and collaborators
pub struct Controller<B: Board> {
    config: FirmwareConfig,

    knob: B::Knob,
    distance: B::Distance,
    motion: B::Motion,
    thermometer: B::Thermometer,
    actuators: ActuatorController<B::Servo, B::Buzzer, B::Indicator>,
    display: B::Display,
    serial: B::Serial,
    clock: B::Clock,

    sampler: SensorSampler,
    state: SystemStateMachine,
    link: CommunicationHealthMonitor,
    presenter: DisplayPresenter,
    parser: LineParser,

    rx_buf: [u8; RX_CHUNK],
    rx_pos: usize,
    rx_len: usize,

    sensor_timer: PeriodicTimer,
    display_timer: PeriodicTimer,
    heartbeat_timer: PeriodicTimer,

    snapshot: SensorSnapshot,
    host_text: Option<DisplayText>,
    started_at_ms: u32,
    pulse_on: bool,
    display_ready: bool,
    display_faulted: bool,
    indicator_faulted: bool,
}

impl<B: Board> Controller<B> {
    /// Take ownership of the board's collaborators
    pub fn new(peripherals: Peripherals<B>, config: FirmwareConfig) -> Self {
        let Peripherals {
            knob,
            distance,
            motion,
            thermometer,
            progress_servo,
            result_servo,
            buzzer,
            indicator,
            display,
            serial,
            clock,
        } = peripherals;

        let now = clock.now_ms();
        let timing = config.timing;

        Self {
            config,
            knob,
            distance,
            motion,
            thermometer,
            actuators: ActuatorController::new(
                progress_servo,
                result_servo,
                buzzer,
                indicator,
                config.actuators,
            ),
            display,
            serial,
            clock,
            sampler: SensorSampler::new(config.sensors, config.movement, now),
            state: SystemStateMachine::new(),
            link: CommunicationHealthMonitor::new(config.link),
            presenter: DisplayPresenter::new(),
            parser: LineParser::new(),
            rx_buf: [0; RX_CHUNK],
            rx_pos: 0,
            rx_len: 0,
            sensor_timer: PeriodicTimer::new(timing.sensor_period_ms, now),
            display_timer: PeriodicTimer::new(timing.display_period_ms, now),
            heartbeat_timer: PeriodicTimer::new(timing.heartbeat_period_ms, now),
            snapshot: SensorSnapshot::default(),
            host_text: None,
            started_at_ms: now,
            pulse_on: true,
            display_ready: false,
            display_faulted: false,
            indicator_faulted: false,
        }
    }

    pub fn config(&self) -> &FirmwareConfig {
        &self.config
    }

    pub fn state(&self) -> SystemState {
        self.state.current()
    }

    pub fn snapshot(&self) -> &SensorSnapshot {
        &self.snapshot
    }

    pub fn health(&self) -> CommunicationHealth {
        self.link.health()
    }

    /// Last display text received from the host
    pub fn host_text(&self) -> Option<&str> {
        self.host_text.as_deref()
    }

    /// Returns true if the display came up at boot
    pub fn display_ready(&self) -> bool {
        self.display_ready
    }

    /// Local bring-up, ending in `Idle`
    ///
    /// Waits (bounded) for the host link, initializes the display and
    /// announces the firmware version. Failures degrade the device but
    /// never stop the boot.
    pub fn boot<D: DelayNs>(&mut self, delay: &mut D) {
        log_info!("triage station {=str} booting", FIRMWARE_VERSION);
        self.refresh_indicators();

        if !self.wait_for_host_link(delay) {
            log_warn!(
                "host link not ready after {=u32} ms, continuing",
                self.config.timing.boot_serial_wait_ms
            );
        }

        match self.display.init() {
            Ok(()) => self.display_ready = true,
            Err(e) => log_warn!("display init failed: {}, running without display", e),
        }

        self.send(&StartupMessage::new(FIRMWARE_VERSION));
        if !self.display_ready {
            let now = self.clock.now_ms();
            self.send(&ErrorReportMessage::actuator_failure(
                now,
                "display",
                "display init failed",
            ));
        }

        self.state.boot_complete();

        let now = self.clock.now_ms();
        self.sensor_timer.reset(now);
        self.display_timer.reset(now);
        self.heartbeat_timer.reset(now);

        self.refresh_indicators();
        self.refresh_display(now);
        log_info!("boot complete");
    }

    /// One pass through the control loop
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();

        self.poll_host(now);

        if self.link.check(now) == Some(LinkEvent::Lost) {
            self.refresh_indicators();
        }

        if self.sensor_timer.poll(now) {
            self.sample(now);
        }

        if self.display_timer.poll(now) {
            self.pulse_on = !self.pulse_on;
            self.refresh_indicators();
            self.refresh_display(now);
        }

        if self.heartbeat_timer.poll(now) {
            let uptime = now.wrapping_sub(self.started_at_ms);
            self.send(&HeartbeatMessage::new(now, uptime));
        }
    }

    fn wait_for_host_link<D: DelayNs>(&mut self, delay: &mut D) -> bool {
        let step = self.config.timing.loop_slice_ms.max(1);
        let limit = self.config.timing.boot_serial_wait_ms;
        let mut waited = 0;

        while !self.serial.is_ready() {
            if waited >= limit {
                return false;
            }
            delay.delay_ms(step);
            waited += step;
        }
        true
    }

    /// Pull bytes from the transport and handle at most one line
    fn poll_host(&mut self, now: u32) {
        if self.rx_pos >= self.rx_len {
            self.rx_pos = 0;
            self.rx_len = 0;
            match self.serial.read(&mut self.rx_buf) {
                Ok(n) => self.rx_len = n.min(RX_CHUNK),
                Err(e) => {
                    log_warn!("host link receive error: {}", e);
                    // A line spanning the lost bytes cannot be trusted
                    self.parser.reset();
                    return;
                }
            }
        }

        if self.rx_pos == self.rx_len {
            return;
        }

        let (used, result) = self
            .parser
            .feed_bytes(&self.rx_buf[self.rx_pos..self.rx_len]);
        self.rx_pos += used;

        match result {
            Ok(Some(line)) => self.handle_line(&line, now),
            Ok(None) => {}
            Err(LineError::Overflow) => {
                log_warn!("inbound line longer than {=usize} bytes dropped", MAX_LINE_LEN)
            }
        }
    }

    fn handle_line(&mut self, line: &[u8], now: u32) {
        let event = match decode_line(line) {
            Ok(event) => event,
            Err(e) => {
                log_debug!("dropped inbound line: {}", e);
                return;
            }
        };

        if self.link.record_message(now).is_some() {
            self.refresh_indicators();
        }

        match event {
            InboundEvent::Control(command) => self.handle_command(command, now),
            InboundEvent::SystemStatus(Some(requested)) => {
                if self.state.apply(requested).is_some() {
                    self.refresh_indicators();
                }
            }
            InboundEvent::SystemStatus(None) => log_debug!("unknown system state ignored"),
            InboundEvent::Heartbeat | InboundEvent::Unrecognized => {}
        }
    }

    fn handle_command(&mut self, command: ControlCommand, now: u32) {
        if let Err(fault) = self.actuators.apply(&command) {
            self.send(&ErrorReportMessage::actuator_failure(
                now,
                fault.actuator,
                "command failed",
            ));
        }

        if let Some(text) = command.display_text {
            self.host_text = Some(text);
        }
    }

    fn sample(&mut self, now: u32) {
        let sample = self.sampler.sample(
            SensorSet {
                knob: &mut self.knob,
                distance: &mut self.distance,
                motion: &mut self.motion,
                thermometer: &mut self.thermometer,
            },
            now,
        );

        let was_moving = self.snapshot.movement_detected;
        self.snapshot = sample.snapshot;

        for (sensor, error) in sample.new_faults.iter() {
            self.send(&ErrorReportMessage::sensor_failure(
                now,
                sensor.name(),
                fault_message(*error),
            ));
        }

        self.send(&SensorDataMessage::new(now, self.snapshot.to_wire()));

        let started_moving = self.snapshot.movement_detected && !was_moving;
        if started_moving && self.state.current() == SystemState::Examining {
            if let Err(e) = self.actuators.buzz(MOVEMENT_CHIRP_HZ, MOVEMENT_CHIRP_MS) {
                log_warn!("movement chirp failed: {}", e);
            }
        }
    }

    fn refresh_indicators(&mut self) {
        let state = state_color(self.state.current(), self.pulse_on);
        let link = link_color(self.link.status());

        match self.actuators.show_local(state, link) {
            Ok(()) => self.indicator_faulted = false,
            Err(e) => {
                if !self.indicator_faulted {
                    log_warn!("indicator update failed: {}", e);
                }
                self.indicator_faulted = true;
            }
        }
    }

    fn refresh_display(&mut self, now: u32) {
        if !self.display_ready {
            return;
        }

        let view = DisplayView {
            snapshot: &self.snapshot,
            state: self.state.current(),
            connected: self.link.is_connected(),
            host_text: self.host_text.as_deref(),
            now_ms: now,
        };

        match self.presenter.render(&mut self.display, &view) {
            Ok(()) => self.display_faulted = false,
            Err(e) => {
                if !self.display_faulted {
                    log_warn!("display refresh failed: {}", e);
                }
                self.display_faulted = true;
            }
        }
    }

    /// Best-effort send of one outbound line
    fn send<M: OutboundMessage>(&mut self, message: &M) {
        let mut buf = [0u8; MAX_OUTBOUND_LEN];
        match encode_line(message, &mut buf) {
            Ok(len) => {
                if let Err(e) = self.serial.write_all(&buf[..len]) {
                    log_warn!("host link write failed: {}", e);
                }
            }
            Err(e) => log_warn!("outbound encode failed: {}", e),
        }
    }
}

fn fault_message(error: SensorError) -> &'static str {
    match error {
        SensorError::Bus => "bus error",
        SensorError::NotReady => "no data",
        SensorError::InvalidData => "invalid reading",
    }
}
