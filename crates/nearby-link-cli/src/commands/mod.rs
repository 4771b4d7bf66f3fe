//! Command implementations.

pub mod config;
pub mod discover;

pub use config::run_config;
pub use discover::run_discover;

use std::path::Path;

use nearby_link_core::{default_config_path, TrackerConfig};

use crate::error::CliError;

/// Load the tracker config from an explicit path, the default config file,
/// or built-in defaults, in that order.
pub(crate) async fn load_config(path: Option<&Path>) -> Result<TrackerConfig, CliError> {
    match path {
        Some(path) => Ok(TrackerConfig::load_from(path).await?),
        None => match default_config_path() {
            Some(path) if path.exists() => Ok(TrackerConfig::load_from(&path).await?),
            _ => Ok(TrackerConfig::default()),
        },
    }
}
