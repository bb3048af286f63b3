//! Host communication health

pub mod monitor;

pub use monitor::{CommunicationHealth, CommunicationHealthMonitor, LinkEvent, LinkStatus};
