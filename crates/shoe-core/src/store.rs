//! JSON persistence for the server configuration.
//!
//! The store keeps a single [`ServerConfig`] in a small JSON file (by
//! default `shoe.json` in the working directory). Writes go to a sibling
//! `*.tmp` file first and are then renamed over the target, so a crash
//! mid-write never leaves a truncated configuration behind.

use crate::constants::DEFAULT_CONFIG_FILE;
use crate::{Result, ServerConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File-backed store for [`ServerConfig`].
///
/// # Example
///
/// ```no_run
/// use shoe_core::ConfigStore;
///
/// # fn example() -> shoe_core::Result<()> {
/// let store = ConfigStore::new("shoe.json");
/// let mut config = store.load_or_default();
/// config.port = 9100;
/// store.save(&config)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

impl ConfigStore {
    /// Create a store backed by the given file
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored configuration.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds an invalid configuration.
    pub fn load(&self) -> Result<ServerConfig> {
        let contents = fs::read_to_string(&self.path)?;
        let config: ServerConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        info!("Loaded config from {}", self.path.display());
        Ok(config)
    }

    /// Load the stored configuration, falling back to defaults.
    ///
    /// When the file is missing or unusable the default configuration is
    /// written in its place so the operator has a file to edit.
    pub fn load_or_default(&self) -> ServerConfig {
        if self.path.exists() {
            match self.load() {
                Ok(config) => return config,
                Err(e) => warn!("Failed to load config: {}", e),
            }
        }

        let config = ServerConfig::default();
        if let Err(e) = self.save(&config) {
            warn!("Failed to write default config: {}", e);
        }
        config
    }

    /// Persist the configuration atomically.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the file cannot
    /// be written or renamed.
    pub fn save(&self, config: &ServerConfig) -> Result<()> {
        config.validate()?;

        let temp_path = self.temp_path();
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        info!("Saved config to {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}
