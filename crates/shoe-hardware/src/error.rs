//! Error types for the serial link.
//!
//! Open failures are split by cause because the operator has to act
//! differently on each: fix group membership, plug the shoe in, or read the
//! driver's message.

/// Result type alias for link operations.
pub type Result<T> = std::result::Result<T, LinkError>;

/// Hint shown when the serial device exists but cannot be opened.
pub const PERMISSION_HINT: &str = "Permission denied. Run: sudo usermod -a -G dialout $USER";

/// Errors that can occur while opening or reading the serial link.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The device exists but the process may not open it.
    #[error("Permission denied: {device}")]
    PermissionDenied { device: String },

    /// No device at the configured path.
    #[error("Device not found: {device}")]
    DeviceNotFound { device: String },

    /// Any other failure reported by the driver while opening.
    #[error("Failed to open {device}: {message}")]
    OpenFailed { device: String, message: String },

    /// The driver reported an error while reading.
    #[error("Read failed: {message}")]
    ReadFailed { message: String },

    /// Operation on a link that is not open.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LinkError {
    /// Create a new permission denied error.
    pub fn permission_denied(device: impl Into<String>) -> Self {
        Self::PermissionDenied {
            device: device.into(),
        }
    }

    /// Create a new device not found error.
    pub fn device_not_found(device: impl Into<String>) -> Self {
        Self::DeviceNotFound {
            device: device.into(),
        }
    }

    /// Create a new open failed error.
    pub fn open_failed(device: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            device: device.into(),
            message: message.into(),
        }
    }

    /// Create a new read failed error.
    pub fn read_failed(message: impl Into<String>) -> Self {
        Self::ReadFailed {
            message: message.into(),
        }
    }

    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Status text shown to the operator.
    ///
    /// # Examples
    ///
    /// ```
    /// use shoe_hardware::LinkError;
    ///
    /// let error = LinkError::device_not_found("/dev/ttyUSB0");
    /// assert_eq!(error.user_message(), "Device not found: /dev/ttyUSB0");
    /// ```
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied { .. } => PERMISSION_HINT.to_string(),
            Self::DeviceNotFound { device } => format!("Device not found: {}", device),
            Self::OpenFailed { message, .. } | Self::ReadFailed { message } => {
                format!("Serial error: {}", message)
            }
            Self::Disconnected { .. } | Self::Io(_) => format!("Serial error: {}", self),
        }
    }
}
