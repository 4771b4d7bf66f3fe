//! Error types for NearbyLink core.

use thiserror::Error;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Scan driver errors.
///
/// Failures from `start_scan` are transient: the tracker logs them and
/// retries on the next scheduled scan tick.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid advertisement: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Advertisement carries no peer identity")]
    MissingIdentity,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid period: {name} must be greater than zero")]
    InvalidPeriod { name: &'static str },

    #[error("Config not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
