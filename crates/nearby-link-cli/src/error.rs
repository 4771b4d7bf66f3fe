//! Error types for NearbyLink CLI.
//!
//! CliError wraps CoreError from the shared library and adds CLI-specific variants.

use nearby_link_core::error::CoreError;
use thiserror::Error;

// Re-export core error types so command modules can use them via crate::error
pub use nearby_link_core::error::{ConfigError, ScanError};

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const SCAN_ERROR: i32 = 2;
    pub const INVALID_ARGS: i32 = 4;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No peers found")]
    NoPeersFound,

    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(e) => match e {
                CoreError::Scan(_) => exit_codes::SCAN_ERROR,
                CoreError::Config(_) => exit_codes::GENERAL_ERROR,
                CoreError::Io(_) => exit_codes::GENERAL_ERROR,
                CoreError::Other(_) => exit_codes::GENERAL_ERROR,
            },
            CliError::Io(_) => exit_codes::GENERAL_ERROR,
            CliError::InvalidArgument(_) => exit_codes::INVALID_ARGS,
            CliError::NoPeersFound => exit_codes::GENERAL_ERROR,
            CliError::Other(_) => exit_codes::GENERAL_ERROR,
        }
    }
}

// Conversions from core error subtypes to CliError
impl From<ScanError> for CliError {
    fn from(e: ScanError) -> Self {
        CliError::Core(CoreError::Scan(e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Core(CoreError::Config(e))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
