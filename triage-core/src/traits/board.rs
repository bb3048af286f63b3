//! Board abstraction
//!
//! A board names the concrete type of every collaborator the control loop
//! drives. The firmware supplies one implementation per hardware target;
//! tests supply mocks.

use super::{
    Buzzer, Clock, DisplayDriver, DistanceSensor, IndicatorLeds, KnobSensor, MotionSensor,
    SerialPort, ServoOutput, TemperatureSensor,
};

/// Collaborator types of a hardware target
pub trait Board {
    type Knob: KnobSensor;
    type Distance: DistanceSensor;
    type Motion: MotionSensor;
    type Thermometer: TemperatureSensor;
    type Servo: ServoOutput;
    type Buzzer: Buzzer;
    type Indicator: IndicatorLeds;
    type Display: DisplayDriver;
    type Serial: SerialPort;
    type Clock: Clock;
}

/// Initialized collaborators, handed to the controller once at boot
pub struct Peripherals<B: Board> {
    pub knob: B::Knob,
    pub distance: B::Distance,
    pub motion: B::Motion,
    pub thermometer: B::Thermometer,
    /// Servo showing examination progress
    pub progress_servo: B::Servo,
    /// Servo pointing at the triage result
    pub result_servo: B::Servo,
    pub buzzer: B::Buzzer,
    pub indicator: B::Indicator,
    pub display: B::Display,
    pub serial: B::Serial,
    pub clock: B::Clock,
}
