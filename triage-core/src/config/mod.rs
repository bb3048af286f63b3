//! Configuration types
//!
//! Board-agnostic configuration structures. The firmware bakes its
//! configuration in at build time from `triage.toml`.

pub mod types;

pub use types::*;
