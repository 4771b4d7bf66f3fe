//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use std::path::Path;

use nearby_link_core::{PeerSnapshot, TrackerConfig};

/// Output formatter trait
pub trait OutputFormatter {
    /// Format a peer list
    fn format_peers(&self, peers: &[PeerSnapshot]) -> String;

    /// Format the effective tracker configuration
    fn format_config(&self, config: &TrackerConfig, path: Option<&Path>) -> String;
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}
