//! Server configuration.

use crate::ManagerSettings;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration of the chess server, loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Draw offers allowed per player per game.
    #[serde(default = "default_max_draw_offers")]
    max_draw_offers: u32,

    /// Seconds a provisioned rematch may wait for its first player.
    #[serde(default = "default_rematch_claim_timeout_secs")]
    rematch_claim_timeout_secs: u64,
}

#[instrument]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[instrument]
fn default_port() -> u16 {
    3000
}

#[instrument]
fn default_max_draw_offers() -> u32 {
    3
}

#[instrument]
fn default_rematch_claim_timeout_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_draw_offers: default_max_draw_offers(),
            rematch_claim_timeout_secs: default_rematch_claim_timeout_secs(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` when given, otherwise the defaults.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Settings for the games manager.
    pub fn manager_settings(&self) -> ManagerSettings {
        ManagerSettings::new(
            self.max_draw_offers,
            Duration::from_secs(self.rematch_claim_timeout_secs),
        )
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
