//! Client settings consumed by the session layer.
//!
//! Settings are loaded from a TOML file. Every key is optional; missing keys fall back to
//! [`Settings::default`].
//!
//! ```toml
//! operation_timeout = 10
//! use_active_subscriber = true
//! show_compressed_modes = false
//! application_tag = "SWQL Studio"
//! subscriber_namespace = "SolarWinds/SwqlStudio"
//! ```
use std::{fs, io, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_APPLICATION_TAG: &str = "SWQL Studio";
pub const DEFAULT_SUBSCRIBER_NAMESPACE: &str = "SolarWinds/SwqlStudio";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] io::Error),

    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to encode settings: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Per-operation timeout applied to every transport, in minutes.
    pub operation_timeout: u64,
    /// Register an active subscriber endpoint on connect when the server type allows it.
    pub use_active_subscriber: bool,
    /// Expose compressed transport variants in the server type catalog.
    pub show_compressed_modes: bool,
    /// Tag attached to every query so the server can attribute load.
    pub application_tag: String,
    /// Namespace segment of the active subscriber endpoint address.
    pub subscriber_namespace: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            operation_timeout: 5,
            use_active_subscriber: false,
            show_compressed_modes: false,
            application_tag: DEFAULT_APPLICATION_TAG.to_string(),
            subscriber_namespace: DEFAULT_SUBSCRIBER_NAMESPACE.to_string(),
        }
    }
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout.saturating_mul(60))
    }
}
