//! Peripheral drivers
//!
//! Thin adapters from bus registers to the collaborator traits of
//! `triage-core`. All of them are generic over the blocking
//! `embedded-hal` bus traits and never wait on a conversion.

pub mod hs3003;
pub mod lsm6dsox;
pub mod modulino;
pub mod servo;
pub mod sh1106;
pub mod vl53l4cd;

pub use hs3003::Hs3003;
pub use lsm6dsox::Lsm6dsox;
pub use modulino::{ModulinoBuzzer, ModulinoKnob, ModulinoPixels};
pub use servo::PwmServo;
pub use sh1106::Sh1106;
pub use vl53l4cd::Vl53l4cd;
