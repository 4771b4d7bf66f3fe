//! JSON-formatted output for CLI.

use std::path::Path;

use nearby_link_core::{PeerSnapshot, TrackerConfig};
use serde::Serialize;
use serde_json::json;

use super::OutputFormatter;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_peers(&self, peers: &[PeerSnapshot]) -> String {
        let output = json!({
            "peers": peers,
            "count": peers.len()
        });
        Self::to_json(&output)
    }

    fn format_config(&self, config: &TrackerConfig, path: Option<&Path>) -> String {
        let output = json!({
            "path": path.map(|p| p.display().to_string()),
            "config": config
        });
        Self::to_json(&output)
    }
}
