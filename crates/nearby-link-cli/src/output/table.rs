//! Table-formatted output for CLI.

use std::path::Path;

use chrono::Utc;
use comfy_table::{Cell, ContentArrangement, Table};
use nearby_link_core::{PeerSnapshot, TrackerConfig};

use super::OutputFormatter;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    fn age(peer: &PeerSnapshot) -> String {
        let seconds = (Utc::now() - peer.last_seen).num_seconds().max(0);
        format!("{}s ago", seconds)
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_peers(&self, peers: &[PeerSnapshot]) -> String {
        if peers.is_empty() {
            return "No peers found.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["ID", "Name", "URI", "RSSI", "Last Seen"]);

        for peer in peers {
            table.add_row(vec![
                Cell::new(peer.id.as_str()),
                Cell::new(peer.name.as_deref().unwrap_or("-")),
                Cell::new(peer.uri.as_deref().unwrap_or("-")),
                Cell::new(format!("{} dBm", peer.rssi)),
                Cell::new(Self::age(peer)),
            ]);
        }

        format!("{}\n\nFound {} peer(s)", table, peers.len())
    }

    fn format_config(&self, config: &TrackerConfig, path: Option<&Path>) -> String {
        let mut lines = Vec::new();

        match path {
            Some(path) => lines.push(format!("Config file: {}", path.display())),
            None => lines.push("Config file: <built-in defaults>".to_string()),
        }
        lines.push(format!("  Scan period:          {} ms", config.scan_period_ms));
        lines.push(format!("  Expiry period:        {} ms", config.expiry_period_ms));
        lines.push(format!("  Debounce period:      {} ms", config.debounce_period_ms));
        lines.push(format!("  Inactivity threshold: {} ms", config.inactivity_threshold_ms));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nearby_link_core::PeerId;

    fn peer(id: &str) -> PeerSnapshot {
        PeerSnapshot {
            id: PeerId::from(id),
            name: Some("lobby".to_string()),
            uri: Some("https://example.com/lobby".to_string()),
            rssi: -60,
            tx_power: None,
            first_seen: Utc::now(),
            last_seen: Utc::now(),
        }
    }

    #[test]
    fn test_format_empty_peer_list() {
        let output = TableOutput::new().format_peers(&[]);
        assert_eq!(output, "No peers found.");
    }

    #[test]
    fn test_format_peers_includes_fields() {
        let output = TableOutput::new().format_peers(&[peer("AA:BB")]);
        assert!(output.contains("AA:BB"));
        assert!(output.contains("https://example.com/lobby"));
        assert!(output.contains("-60 dBm"));
        assert!(output.contains("Found 1 peer(s)"));
    }

    #[test]
    fn test_format_config_defaults() {
        let output = TableOutput::new().format_config(&TrackerConfig::default(), None);
        assert!(output.contains("<built-in defaults>"));
        assert!(output.contains("5000 ms"));
    }
}
