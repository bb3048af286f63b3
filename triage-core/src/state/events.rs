//! Events that trigger state transitions

use triage_protocol::HostState;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Local boot sequence finished
    BootComplete,
    /// Host asked for a state via `system_status`
    HostRequest(HostState),
}
