//! Cooperative scheduling primitives

pub mod timer;

pub use timer::PeriodicTimer;
