//! Serial link layer for the card shoe monitor.
//!
//! This crate owns everything between the shoe's serial port and the
//! observer: the [`ShoeLink`] abstraction with its serial and mock
//! implementations, and the [`ShoeMonitor`] that keeps the link alive,
//! classifies the stream and relays dealt cards.
//!
//! # Design
//!
//! - **Async-first**: link operations use native `async fn` in traits
//!   (Rust 1.90 + Edition 2024 RPITIT).
//! - **Enum dispatch**: [`AnyShoeLink`] stands in for `Box<dyn ShoeLink>`,
//!   which native async traits cannot provide.
//! - **Read-only**: the shoe is never written to.
//!
//! # Quick start
//!
//! ```no_run
//! use shoe_core::{MonitorConfig, SerialConfig, ServerConfig};
//! use shoe_hardware::{AnyShoeLink, ShoeMonitor};
//! use shoe_network::HttpDispatcher;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MonitorConfig::new(
//!         SerialConfig::new("/dev/ttyUSB0").baud_rate(9600),
//!         ServerConfig::default(),
//!     );
//!     let monitor = ShoeMonitor::new(config, AnyShoeLink::serial(), HttpDispatcher::new()?);
//!
//!     let mut handle = monitor.start();
//!     while let Some(event) = handle.recv().await {
//!         println!("{:?}", event);
//!     }
//!     Ok(())
//! }
//! ```

pub mod devices;
pub mod error;
pub mod manager;
pub mod mock;
pub mod serial;
pub mod traits;

pub use devices::AnyShoeLink;
pub use error::{LinkError, Result};
pub use manager::{ConnectionState, MonitorEvent, MonitorHandle, ShoeMonitor};
pub use serial::SerialPortLink;
pub use traits::ShoeLink;
