//! Enum wrapper for link dispatch.
//!
//! Native `async fn` in traits is not object-safe, so the monitor cannot
//! hold a `Box<dyn ShoeLink>`. [`AnyShoeLink`] gives it one concrete type
//! covering every link implementation.

use crate::mock::MockLink;
use crate::serial::SerialPortLink;
use crate::traits::ShoeLink;
use crate::Result;
use shoe_core::SerialConfig;

/// Any supported shoe link.
///
/// # Examples
///
/// ```
/// use shoe_hardware::devices::AnyShoeLink;
/// use shoe_hardware::mock::MockLink;
///
/// let (link, _handle) = MockLink::new();
/// let link = AnyShoeLink::Mock(link);
/// ```
#[derive(Debug)]
pub enum AnyShoeLink {
    /// Local serial port.
    Serial(SerialPortLink),

    /// Scripted link for tests and demos.
    Mock(MockLink),
}

impl AnyShoeLink {
    /// A closed serial port link.
    pub fn serial() -> Self {
        Self::Serial(SerialPortLink::new())
    }
}

impl ShoeLink for AnyShoeLink {
    async fn open(&mut self, config: &SerialConfig) -> Result<()> {
        match self {
            Self::Serial(link) => link.open(config).await,
            Self::Mock(link) => link.open(config).await,
        }
    }

    async fn read_available(&mut self) -> Result<Vec<u8>> {
        match self {
            Self::Serial(link) => link.read_available().await,
            Self::Mock(link) => link.read_available().await,
        }
    }

    async fn close(&mut self) {
        match self {
            Self::Serial(link) => link.close().await,
            Self::Mock(link) => link.close().await,
        }
    }

    fn is_open(&self) -> bool {
        match self {
            Self::Serial(link) => link.is_open(),
            Self::Mock(link) => link.is_open(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_link_mock() {
        let (link, handle) = MockLink::new();
        handle.push_bytes(" [Game]<Card:4S> ");
        let mut link = AnyShoeLink::Mock(link);

        link.open(&SerialConfig::default()).await.unwrap();
        assert!(link.is_open());
        assert_eq!(link.read_available().await.unwrap(), b" [Game]<Card:4S> ");

        link.close().await;
        assert!(!link.is_open());
    }

    #[tokio::test]
    async fn test_any_link_serial_starts_closed() {
        let link = AnyShoeLink::serial();
        assert!(!link.is_open());
    }
}
