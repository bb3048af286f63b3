//! Test doubles for every collaborator trait
//!
//! Each mock is a cheap handle around shared state, so a test can keep a
//! clone after moving the original into the controller and then script
//! inputs or inspect recorded outputs.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::traits::{
    Acceleration, ActuatorError, Board, Buzzer, Clock, DisplayDriver, DisplayError,
    DistanceSensor, IndicatorLeds, KnobSensor, MotionSensor, Peripherals, Rgb, SensorError,
    SerialError, SerialPort, ServoOutput, TemperatureSensor,
};

// ---- time ----

#[derive(Debug, Clone, Default)]
pub struct MockClock(Rc<Cell<u32>>);

impl MockClock {
    pub fn new(start_ms: u32) -> Self {
        Self(Rc::new(Cell::new(start_ms)))
    }

    pub fn set(&self, ms: u32) {
        self.0.set(ms);
    }

    pub fn advance(&self, ms: u32) {
        self.0.set(self.0.get().wrapping_add(ms));
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }
}

/// Delay that advances a [`MockClock`] instead of sleeping
#[derive(Debug, Clone)]
pub struct MockDelay {
    clock: MockClock,
    total_ms: Rc<Cell<u32>>,
}

impl MockDelay {
    pub fn new(clock: MockClock) -> Self {
        Self {
            clock,
            total_ms: Rc::new(Cell::new(0)),
        }
    }

    /// Total time spent in delays
    pub fn total_ms(&self) -> u32 {
        self.total_ms.get()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance(ms);
        self.total_ms.set(self.total_ms.get() + ms);
    }
}

// ---- sensors ----

macro_rules! scripted_sensor {
    ($name:ident, $value:ty) => {
        #[derive(Debug, Clone)]
        pub struct $name(Rc<Cell<Result<$value, SensorError>>>);

        impl $name {
            pub fn new(value: $value) -> Self {
                Self(Rc::new(Cell::new(Ok(value))))
            }

            pub fn set(&self, value: $value) {
                self.0.set(Ok(value));
            }

            pub fn fail(&self, error: SensorError) {
                self.0.set(Err(error));
            }

            fn next(&self) -> Result<$value, SensorError> {
                self.0.get()
            }
        }
    };
}

scripted_sensor!(MockKnob, i32);
scripted_sensor!(MockDistance, i32);
scripted_sensor!(MockThermometer, f32);

impl KnobSensor for MockKnob {
    fn read_position(&mut self) -> Result<i32, SensorError> {
        self.next()
    }
}

impl DistanceSensor for MockDistance {
    fn read_distance_mm(&mut self) -> Result<i32, SensorError> {
        self.next()
    }
}

impl TemperatureSensor for MockThermometer {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        self.next()
    }
}

#[derive(Debug, Clone)]
pub struct MockMotion {
    sample: Rc<Cell<Result<Acceleration, SensorError>>>,
    available: Rc<Cell<bool>>,
}

impl MockMotion {
    pub fn new(accel: Acceleration) -> Self {
        Self {
            sample: Rc::new(Cell::new(Ok(accel))),
            available: Rc::new(Cell::new(true)),
        }
    }

    pub fn set(&self, accel: Acceleration) {
        self.sample.set(Ok(accel));
    }

    pub fn fail(&self, error: SensorError) {
        self.sample.set(Err(error));
    }

    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }
}

impl MotionSensor for MockMotion {
    fn available(&mut self) -> bool {
        self.available.get()
    }

    fn read_accel(&mut self) -> Result<Acceleration, SensorError> {
        self.sample.get()
    }
}

// ---- actuators ----

#[derive(Debug, Default)]
struct ServoState {
    angles: Vec<u8>,
    fail: Option<ActuatorError>,
}

#[derive(Debug, Clone, Default)]
pub struct MockServo(Rc<RefCell<ServoState>>);

impl MockServo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angles(&self) -> Vec<u8> {
        self.0.borrow().angles.clone()
    }

    pub fn fail(&self, error: ActuatorError) {
        self.0.borrow_mut().fail = Some(error);
    }
}

impl ServoOutput for MockServo {
    fn write_angle(&mut self, degrees: u8) -> Result<(), ActuatorError> {
        let mut state = self.0.borrow_mut();
        if let Some(error) = state.fail {
            return Err(error);
        }
        state.angles.push(degrees);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerCall {
    Tone(u16, u16),
    Silence,
}

#[derive(Debug, Clone, Default)]
pub struct MockBuzzer(Rc<RefCell<Vec<BuzzerCall>>>);

impl MockBuzzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<BuzzerCall> {
        self.0.borrow().clone()
    }
}

impl Buzzer for MockBuzzer {
    fn tone(&mut self, frequency_hz: u16, duration_ms: u16) -> Result<(), ActuatorError> {
        self.0
            .borrow_mut()
            .push(BuzzerCall::Tone(frequency_hz, duration_ms));
        Ok(())
    }

    fn silence(&mut self) -> Result<(), ActuatorError> {
        self.0.borrow_mut().push(BuzzerCall::Silence);
        Ok(())
    }
}

#[derive(Debug)]
struct IndicatorState {
    staged: Vec<Rgb>,
    shown: Vec<Rgb>,
    shows: usize,
}

#[derive(Debug, Clone)]
pub struct MockIndicator(Rc<RefCell<IndicatorState>>);

impl MockIndicator {
    pub fn new(channels: u8) -> Self {
        let colors = vec![Rgb::OFF; channels as usize];
        Self(Rc::new(RefCell::new(IndicatorState {
            staged: colors.clone(),
            shown: colors,
            shows: 0,
        })))
    }

    /// Colour currently latched on `channel`
    pub fn color(&self, channel: u8) -> Rgb {
        self.0.borrow().shown[channel as usize]
    }

    pub fn shows(&self) -> usize {
        self.0.borrow().shows
    }
}

impl IndicatorLeds for MockIndicator {
    fn channels(&self) -> u8 {
        self.0.borrow().staged.len() as u8
    }

    fn set(&mut self, channel: u8, color: Rgb) -> Result<(), ActuatorError> {
        let mut state = self.0.borrow_mut();
        match state.staged.get_mut(channel as usize) {
            Some(slot) => {
                *slot = color;
                Ok(())
            }
            None => Err(ActuatorError::Output),
        }
    }

    fn show(&mut self) -> Result<(), ActuatorError> {
        let mut state = self.0.borrow_mut();
        state.shown = state.staged.clone();
        state.shows += 1;
        Ok(())
    }
}

// ---- display ----

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Clear,
    Text {
        x: i32,
        y: i32,
        text: String,
    },
    Rect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        filled: bool,
    },
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
    },
    Present,
}

#[derive(Debug, Default)]
struct DisplayState {
    calls: Vec<DrawCall>,
    fail_init: bool,
    presents: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MockDisplay(Rc<RefCell<DisplayState>>);

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `init` fail with a bus error
    pub fn fail_init(&self) {
        self.0.borrow_mut().fail_init = true;
    }

    pub fn calls(&self) -> Vec<DrawCall> {
        self.0.borrow().calls.clone()
    }

    pub fn presents(&self) -> usize {
        self.0.borrow().presents
    }

    /// Text drawn since the last `clear`
    pub fn texts(&self) -> Vec<String> {
        let state = self.0.borrow();
        let start = state
            .calls
            .iter()
            .rposition(|c| *c == DrawCall::Clear)
            .unwrap_or(0);
        state.calls[start..]
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: DrawCall) -> Result<(), DisplayError> {
        self.0.borrow_mut().calls.push(call);
        Ok(())
    }
}

impl DisplayDriver for MockDisplay {
    fn init(&mut self) -> Result<(), DisplayError> {
        if self.0.borrow().fail_init {
            Err(DisplayError::Bus)
        } else {
            Ok(())
        }
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.record(DrawCall::Clear)
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), DisplayError> {
        self.record(DrawCall::Text {
            x,
            y,
            text: text.into(),
        })
    }

    fn draw_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        filled: bool,
    ) -> Result<(), DisplayError> {
        self.record(DrawCall::Rect {
            x,
            y,
            width,
            height,
            filled,
        })
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), DisplayError> {
        self.record(DrawCall::Line { x0, y0, x1, y1 })
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.0.borrow_mut().presents += 1;
        self.record(DrawCall::Present)
    }
}

// ---- serial ----

#[derive(Debug, Default)]
struct SerialState {
    ready: bool,
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct MockSerial(Rc<RefCell<SerialState>>);

impl MockSerial {
    pub fn new(ready: bool) -> Self {
        let serial = Self::default();
        serial.set_ready(ready);
        serial
    }

    pub fn set_ready(&self, ready: bool) {
        self.0.borrow_mut().ready = ready;
    }

    /// Queue bytes as if sent by the host
    pub fn push_rx(&self, bytes: &[u8]) {
        self.0.borrow_mut().rx.extend(bytes.iter().copied());
    }

    /// Queue one line as if sent by the host
    pub fn push_line(&self, line: &str) {
        self.push_rx(line.as_bytes());
        self.push_rx(b"\n");
    }

    pub fn pending_rx(&self) -> usize {
        self.0.borrow().rx.len()
    }

    /// Drain everything written so far, split into lines
    pub fn take_lines(&self) -> Vec<String> {
        let tx = core::mem::take(&mut self.0.borrow_mut().tx);
        String::from_utf8(tx)
            .expect("firmware wrote invalid UTF-8")
            .lines()
            .map(String::from)
            .collect()
    }
}

impl SerialPort for MockSerial {
    fn is_ready(&mut self) -> bool {
        self.0.borrow().ready
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        let mut state = self.0.borrow_mut();
        let n = buf.len().min(state.rx.len());
        for (slot, byte) in buf.iter_mut().zip(state.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        self.0.borrow_mut().tx.extend_from_slice(bytes);
        Ok(())
    }
}

// ---- board ----

pub struct MockBoard;

impl Board for MockBoard {
    type Knob = MockKnob;
    type Distance = MockDistance;
    type Motion = MockMotion;
    type Thermometer = MockThermometer;
    type Servo = MockServo;
    type Buzzer = MockBuzzer;
    type Indicator = MockIndicator;
    type Display = MockDisplay;
    type Serial = MockSerial;
    type Clock = MockClock;
}

/// Handles to every mock behind a [`MockBoard`]
#[derive(Clone)]
pub struct MockRig {
    pub knob: MockKnob,
    pub distance: MockDistance,
    pub motion: MockMotion,
    pub thermometer: MockThermometer,
    pub progress_servo: MockServo,
    pub result_servo: MockServo,
    pub buzzer: MockBuzzer,
    pub indicator: MockIndicator,
    pub display: MockDisplay,
    pub serial: MockSerial,
    pub clock: MockClock,
}

impl MockRig {
    /// A healthy device at rest, probe in range, host link up
    pub fn new() -> Self {
        Self {
            knob: MockKnob::new(10),
            distance: MockDistance::new(50),
            motion: MockMotion::new(Acceleration::new(0.0, 0.0, 1.0)),
            thermometer: MockThermometer::new(36.6),
            progress_servo: MockServo::new(),
            result_servo: MockServo::new(),
            buzzer: MockBuzzer::new(),
            indicator: MockIndicator::new(8),
            display: MockDisplay::new(),
            serial: MockSerial::new(true),
            clock: MockClock::new(0),
        }
    }

    pub fn peripherals(&self) -> Peripherals<MockBoard> {
        Peripherals {
            knob: self.knob.clone(),
            distance: self.distance.clone(),
            motion: self.motion.clone(),
            thermometer: self.thermometer.clone(),
            progress_servo: self.progress_servo.clone(),
            result_servo: self.result_servo.clone(),
            buzzer: self.buzzer.clone(),
            indicator: self.indicator.clone(),
            display: self.display.clone(),
            serial: self.serial.clone(),
            clock: self.clock.clone(),
        }
    }

    pub fn delay(&self) -> MockDelay {
        MockDelay::new(self.clock.clone())
    }
}
