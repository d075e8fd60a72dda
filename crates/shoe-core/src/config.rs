//! Session configuration.
//!
//! A monitoring session is started from a [`MonitorConfig`] snapshot: the
//! serial link settings, the card server address, and the loop timings.
//! The snapshot is moved into the monitor task when the session starts, so
//! edits made afterwards only apply to the next session.

use crate::constants::{
    DEFAULT_BAUD_RATE, DEFAULT_SERIAL_DEVICE, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PATH,
    DEFAULT_SERVER_PORT, POLL_INTERVAL_MS, RETRY_DELAY_MS, SERIAL_TIMEOUT_MS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Address of the server that receives card notifications.
///
/// The JSON field names (`ip`, `port`, `url`) match the configuration files
/// written by earlier releases of the monitor.
///
/// # Example
///
/// ```
/// use shoe_core::ServerConfig;
///
/// let config = ServerConfig::from_fields("10.0.0.5", "8080", "cards").unwrap();
/// assert_eq!(config.port, 8080);
///
/// assert!(ServerConfig::from_fields("10.0.0.5", "0", "cards").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host name or IP address
    #[serde(rename = "ip")]
    pub host: String,

    /// Server TCP port (1-65535)
    pub port: u16,

    /// Endpoint path, with or without a leading slash
    #[serde(rename = "url")]
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            path: DEFAULT_SERVER_PATH.to_string(),
        }
    }
}

impl ServerConfig {
    /// Create a validated server configuration.
    ///
    /// # Errors
    /// Returns `Error::MissingField` for an empty host or path and
    /// `Error::InvalidPort` for port 0.
    pub fn new(host: impl Into<String>, port: u16, path: impl Into<String>) -> Result<Self> {
        let config = Self {
            host: host.into().trim().to_string(),
            port,
            path: path.into().trim().to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from free-text form fields.
    ///
    /// All fields are trimmed; the port must parse as an integer in 1-65535.
    ///
    /// # Errors
    /// Returns `Error::MissingField` if any field is blank and
    /// `Error::InvalidPort` if the port does not parse or is out of range.
    pub fn from_fields(host: &str, port: &str, path: &str) -> Result<Self> {
        let port = port.trim();
        if port.is_empty() {
            return Err(Error::MissingField("port".to_string()));
        }
        let port: u16 = port
            .parse()
            .map_err(|_| Error::InvalidPort(port.to_string()))?;
        Self::new(host, port, path)
    }

    /// Check the invariants of a configuration loaded from elsewhere.
    ///
    /// # Errors
    /// Same conditions as [`ServerConfig::new`].
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::MissingField("host".to_string()));
        }
        if self.port == 0 {
            return Err(Error::InvalidPort(self.port.to_string()));
        }
        if self.path.trim().is_empty() {
            return Err(Error::MissingField("path".to_string()));
        }
        Ok(())
    }
}

/// Serial link settings for the shoe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyUSB0` or `COM3`
    pub device: String,

    /// Baud rate
    pub baud_rate: u32,

    /// Driver read timeout
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_SERIAL_DEVICE.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: Duration::from_millis(SERIAL_TIMEOUT_MS),
        }
    }
}

impl SerialConfig {
    /// Create serial settings for the given device with default baud rate
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Default::default()
        }
    }

    /// Set the baud rate
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the driver read timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Everything a monitoring session needs at start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Serial link settings
    pub serial: SerialConfig,

    /// Card server address
    pub server: ServerConfig,

    /// Fixed delay before reconnecting after a link failure
    pub retry_delay: Duration,

    /// Sleep between checks for waiting bytes
    pub poll_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            server: ServerConfig::default(),
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
        }
    }
}

impl MonitorConfig {
    /// Create a session configuration with default timings
    pub fn new(serial: SerialConfig, server: ServerConfig) -> Self {
        Self {
            serial,
            server,
            ..Default::default()
        }
    }

    /// Set the reconnect delay
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the idle poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "192.168.1.140");
        assert_eq!(config.port, 9000);
        assert_eq!(config.path, "api/holdem/beetek/card");
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case("127.0.0.1", "1", "cards", 1)]
    #[case(" 127.0.0.1 ", " 65535 ", " /cards ", 65535)]
    fn test_from_fields_valid(
        #[case] host: &str,
        #[case] port: &str,
        #[case] path: &str,
        #[case] expected_port: u16,
    ) {
        let config = ServerConfig::from_fields(host, port, path).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, expected_port);
        assert_eq!(config.path, path.trim());
    }

    #[rstest]
    #[case("", "9000", "cards")]
    #[case("host", "", "cards")]
    #[case("host", "9000", "  ")]
    fn test_from_fields_missing(#[case] host: &str, #[case] port: &str, #[case] path: &str) {
        let result = ServerConfig::from_fields(host, port, path);
        assert!(matches!(result, Err(Error::MissingField(_))));
    }

    #[rstest]
    #[case("0")]
    #[case("65536")]
    #[case("-1")]
    #[case("http")]
    fn test_from_fields_invalid_port(#[case] port: &str) {
        let result = ServerConfig::from_fields("host", port, "cards");
        assert!(matches!(result, Err(Error::InvalidPort(_))));
    }

    #[test]
    fn test_server_config_legacy_json_keys() {
        let json = r#"{"ip": "10.1.1.1", "port": 8000, "url": "/card"}"#;
        let config: ServerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.host, "10.1.1.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.path, "/card");

        let written = serde_json::to_value(&config).unwrap();
        assert_eq!(written["ip"], "10.1.1.1");
        assert_eq!(written["url"], "/card");
    }

    #[test]
    fn test_serial_config_builder() {
        let config = SerialConfig::new("/dev/ttyACM0")
            .baud_rate(115_200)
            .timeout(Duration::from_millis(500));
        assert_eq!(config.device, "/dev/ttyACM0");
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_monitor_config_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.serial.device, "/dev/ttyUSB0");
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.retry_delay, Duration::from_millis(2500));
        assert_eq!(config.poll_interval, Duration::from_millis(50));
    }
}
