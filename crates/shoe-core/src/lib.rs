pub mod config;
pub mod constants;
pub mod error;
pub mod store;
pub mod types;

pub use config::{MonitorConfig, SerialConfig, ServerConfig};
pub use error::{Error, Result};
pub use store::ConfigStore;
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
