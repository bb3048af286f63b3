//! Host link watchdog
//!
//! Any successfully decoded inbound message counts as traffic. If the host
//! stays silent for longer than the timeout the link is marked lost; the
//! next message restores it. Connectivity never affects the system state.

use crate::config::LinkConfig;

/// Connectivity as seen from the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommunicationHealth {
    pub connected: bool,
    /// Clock reading of the last decoded inbound message
    pub last_message_at_ms: u32,
}

/// Coarse link status, used for indication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    /// No message received since boot
    NeverConnected,
    Connected,
    /// Host went silent after having talked to us
    Lost,
}

/// Edge reported by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// First message after boot or after a loss
    Connected,
    /// Timeout elapsed without traffic
    Lost,
}

/// Communication health monitor
#[derive(Debug, Clone)]
pub struct CommunicationHealthMonitor {
    health: CommunicationHealth,
    timeout_ms: u32,
    ever_connected: bool,
}

impl CommunicationHealthMonitor {
    pub fn new(config: LinkConfig) -> Self {
        Self {
            health: CommunicationHealth::default(),
            timeout_ms: config.timeout_ms,
            ever_connected: false,
        }
    }

    pub fn health(&self) -> CommunicationHealth {
        self.health
    }

    pub fn is_connected(&self) -> bool {
        self.health.connected
    }

    pub fn status(&self) -> LinkStatus {
        match (self.health.connected, self.ever_connected) {
            (true, _) => LinkStatus::Connected,
            (false, true) => LinkStatus::Lost,
            (false, false) => LinkStatus::NeverConnected,
        }
    }

    /// Record a successfully decoded inbound message
    pub fn record_message(&mut self, now_ms: u32) -> Option<LinkEvent> {
        let was_connected = self.health.connected;
        self.health.connected = true;
        self.health.last_message_at_ms = now_ms;
        self.ever_connected = true;

        if was_connected {
            None
        } else {
            log_info!("host link up");
            Some(LinkEvent::Connected)
        }
    }

    /// Check for a timeout; call once per loop iteration
    pub fn check(&mut self, now_ms: u32) -> Option<LinkEvent> {
        if !self.health.connected {
            return None;
        }

        let silent_for = now_ms.wrapping_sub(self.health.last_message_at_ms);
        if silent_for > self.timeout_ms {
            self.health.connected = false;
            log_warn!("host link lost after {=u32} ms of silence", silent_for);
            return Some(LinkEvent::Lost);
        }

        None
    }
}
