//! Status line shown for connection notifications.

use shoe_core::SerialConfig;
use shoe_hardware::MonitorEvent;

/// Longest error text shown on the status line.
const MAX_ERROR_CHARS: usize = 30;

pub const STOPPED: &str = "Stopped";

/// Formats connection notifications for the operator.
#[derive(Debug, Clone)]
pub struct StatusLine {
    connected: String,
}

impl StatusLine {
    pub fn new(serial: &SerialConfig) -> Self {
        Self {
            connected: format!("Connected ({} @{})", serial.device, serial.baud_rate),
        }
    }

    /// Status text for `event`, or `None` for card notifications.
    pub fn describe(&self, event: &MonitorEvent) -> Option<String> {
        match event {
            MonitorEvent::Connected => Some(self.connected.clone()),
            MonitorEvent::Disconnected { .. } => Some("Disconnected (retrying...)".to_string()),
            MonitorEvent::Error { message } => {
                let short: String = message.chars().take(MAX_ERROR_CHARS).collect();
                Some(format!("Error: {}", short))
            }
            MonitorEvent::Card { .. } => None,
        }
    }
}
