//! Tracker timing configuration.
//!
//! Periods are stored as milliseconds for JSON compatibility and exposed as
//! `Duration` accessors.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::ConfigError;

/// Timing parameters for the peer tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerConfig {
    /// Interval between scan restarts
    pub scan_period_ms: u64,
    /// Interval between expiry sweeps
    pub expiry_period_ms: u64,
    /// Batching window for enrichment requests
    pub debounce_period_ms: u64,
    /// Time since last detection before a peer is considered gone
    pub inactivity_threshold_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            scan_period_ms: 5000,
            expiry_period_ms: 3000,
            debounce_period_ms: 500,
            inactivity_threshold_ms: 10000,
        }
    }
}

impl TrackerConfig {
    pub fn scan_period(&self) -> Duration {
        Duration::from_millis(self.scan_period_ms)
    }

    pub fn expiry_period(&self) -> Duration {
        Duration::from_millis(self.expiry_period_ms)
    }

    pub fn debounce_period(&self) -> Duration {
        Duration::from_millis(self.debounce_period_ms)
    }

    pub fn inactivity_threshold(&self) -> Duration {
        Duration::from_millis(self.inactivity_threshold_ms)
    }

    /// Reject configurations the timers cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("scanPeriodMs", self.scan_period_ms),
            ("expiryPeriodMs", self.expiry_period_ms),
            ("debouncePeriodMs", self.debounce_period_ms),
            ("inactivityThresholdMs", self.inactivity_threshold_ms),
        ];

        for (name, value) in periods {
            if value == 0 {
                return Err(ConfigError::InvalidPeriod { name });
            }
        }

        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub async fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let contents = fs::read_to_string(path).await.map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;

        Ok(config)
    }

    /// Save this configuration as pretty-printed JSON.
    pub async fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(ConfigError::Io)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents).await.map_err(ConfigError::Io)?;

        Ok(())
    }
}

/// Default config file path for NearbyLink tools.
///
/// Uses the `directories` crate to find the appropriate platform-specific
/// config directory.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "nearby-link", "nearby-link-manager")
        .map(|dirs| dirs.config_dir().join("tracker.json"))
}
