//! Hardware abstraction traits
//!
//! These traits define the interface between the control loop and the
//! board-specific sensor, actuator, display and transport drivers.

pub mod actuator;
pub mod board;
pub mod clock;
pub mod display;
pub mod sensor;
pub mod serial;

pub use actuator::{ActuatorError, Buzzer, IndicatorLeds, Rgb, ServoOutput};
pub use board::{Board, Peripherals};
pub use clock::Clock;
pub use display::{DisplayDriver, DisplayError, DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use sensor::{
    Acceleration, DistanceSensor, KnobSensor, MotionSensor, SensorError, TemperatureSensor,
};
pub use serial::{SerialError, SerialPort};
