//! State machine definition
//!
//! The host owns triage logic, so apart from the single boot edge every
//! transition is requested over the serial link. Sensor values never move
//! the machine.

use triage_protocol::HostState;

use super::events::Event;

/// Device lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemState {
    /// Local bring-up in progress
    #[default]
    Initializing,
    /// Waiting for the host to start an examination
    Idle,
    /// Examination in progress
    Examining,
    /// Host is showing a triage result
    Results,
    /// Host reported a fault
    Error,
}

impl SystemState {
    /// Short label for the display
    pub fn label(self) -> &'static str {
        match self {
            SystemState::Initializing => "INIT",
            SystemState::Idle => "IDLE",
            SystemState::Examining => "EXAMINING",
            SystemState::Results => "RESULTS",
            SystemState::Error => "ERROR",
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use SystemState::*;

        match (self, event) {
            // The only locally driven edge
            (Initializing, Event::BootComplete) => Idle,

            // Host requests are ignored until local bring-up is done
            (Initializing, Event::HostRequest(_)) => Initializing,

            // After boot the host is authoritative from any state
            (_, Event::HostRequest(requested)) => match requested {
                HostState::Idle => Idle,
                HostState::Examining => Examining,
                HostState::ShowingResults => Results,
                HostState::Error => Error,
            },

            // Default: stay in current state
            _ => self,
        }
    }
}

/// A state change that actually happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: SystemState,
    pub to: SystemState,
}

/// Holder of the current [`SystemState`]
#[derive(Debug, Clone, Default)]
pub struct SystemStateMachine {
    state: SystemState,
}

impl SystemStateMachine {
    /// Create a machine in `Initializing`
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> SystemState {
        self.state
    }

    /// Apply an event; returns the transition if the state changed
    pub fn handle(&mut self, event: Event) -> Option<Transition> {
        let from = self.state;
        let to = from.transition(event);
        if to == from {
            return None;
        }

        self.state = to;
        log_info!("state {} -> {}", from.label(), to.label());
        Some(Transition { from, to })
    }

    /// Local bring-up finished
    pub fn boot_complete(&mut self) -> Option<Transition> {
        self.handle(Event::BootComplete)
    }

    /// Apply a decoded host state request
    pub fn apply(&mut self, requested: HostState) -> Option<Transition> {
        self.handle(Event::HostRequest(requested))
    }

    /// Apply a host state by wire name; unknown names are ignored
    pub fn apply_name(&mut self, name: &str) -> Option<Transition> {
        HostState::from_name(name).and_then(|requested| self.apply(requested))
    }
}
