//! System state machine
//!
//! Five-state device lifecycle. The machine is explicit, finite and
//! deterministic; its only input is [`Event`].

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{SystemState, SystemStateMachine, Transition};
