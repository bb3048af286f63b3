//! Sensor fusion
//!
//! Turns raw accessor reads into the snapshot consumed by the display,
//! the outbound protocol and the local actuator reactions.

pub mod movement;
pub mod sampler;
pub mod snapshot;

pub use movement::{MovementStabilityTracker, MovementStatus};
pub use sampler::{Sample, SensorKind, SensorSampler, SensorSet};
pub use snapshot::{KnobMode, SensorSnapshot};
