//! Serial port link backed by the `serialport` crate.

use crate::error::{LinkError, Result};
use crate::traits::ShoeLink;
use serialport::{ErrorKind, SerialPort};
use shoe_core::SerialConfig;
use std::io::{self, Read};
use tracing::{debug, info};

/// Link to a shoe on a local serial port.
///
/// Opening runs on the blocking pool. Reads stay on the task: only the
/// bytes the driver reports as waiting are read, so they return at once.
pub struct SerialPortLink {
    port: Option<Box<dyn SerialPort>>,
    device: String,
}

impl SerialPortLink {
    /// Create a closed link.
    pub fn new() -> Self {
        Self {
            port: None,
            device: String::new(),
        }
    }

    /// Device path of the last open attempt.
    pub fn device(&self) -> &str {
        &self.device
    }
}

impl Default for SerialPortLink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SerialPortLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPortLink")
            .field("device", &self.device)
            .field("open", &self.port.is_some())
            .finish()
    }
}

impl ShoeLink for SerialPortLink {
    async fn open(&mut self, config: &SerialConfig) -> Result<()> {
        self.close().await;
        self.device = config.device.clone();

        // Opening can stall on a misbehaving adapter; keep it off the runtime.
        let builder = serialport::new(&config.device, config.baud_rate).timeout(config.timeout);
        let port = tokio::task::spawn_blocking(move || builder.open())
            .await
            .map_err(|e| LinkError::open_failed(&config.device, e.to_string()))?
            .map_err(|e| open_error(&config.device, e))?;

        info!("Opened {} at {} baud", config.device, config.baud_rate);
        self.port = Some(port);
        Ok(())
    }

    async fn read_available(&mut self) -> Result<Vec<u8>> {
        let Some(port) = self.port.as_mut() else {
            return Err(LinkError::disconnected(&self.device));
        };

        let waiting = port
            .bytes_to_read()
            .map_err(|e| LinkError::read_failed(e.to_string()))? as usize;
        if waiting == 0 {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; waiting];
        match port.read(&mut buf) {
            Ok(n) => {
                buf.truncate(n);
                debug!("Read {} bytes from {}", n, self.device);
                Ok(buf)
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(Vec::new()),
            Err(e) => Err(LinkError::read_failed(e.to_string())),
        }
    }

    async fn close(&mut self) {
        if self.port.take().is_some() {
            info!("Closed {}", self.device);
        }
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }
}

/// Classify a driver error from opening `device`.
pub(crate) fn open_error(device: &str, e: serialport::Error) -> LinkError {
    let description = e.description.to_ascii_lowercase();
    match e.kind() {
        ErrorKind::NoDevice | ErrorKind::Io(io::ErrorKind::NotFound) => {
            LinkError::device_not_found(device)
        }
        ErrorKind::Io(io::ErrorKind::PermissionDenied) => LinkError::permission_denied(device),
        _ if description.contains("permission denied") => LinkError::permission_denied(device),
        _ if description.contains("no such file") => LinkError::device_not_found(device),
        _ => LinkError::open_failed(device, e.description),
    }
}
