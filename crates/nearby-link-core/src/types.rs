//! Type definitions for NearbyLink peer tracking.
//!
//! `PeerRecord` is the in-memory tracking state and uses monotonic
//! timestamps; `PeerSnapshot` is the serde-facing view handed to the CLI,
//! JSON output, and the enrichment service.

use std::fmt;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Opaque, driver-supplied stable peer identifier (e.g. a hardware address).
///
/// Equality on `PeerId` defines "same peer".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PeerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Advertisement payload broadcast by a beacon peer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    /// Human-readable beacon name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Content URI the beacon is broadcasting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Advertised transmit power in dBm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_power: Option<i8>,
}

/// One raw detection yielded by a scan driver.
#[derive(Debug, Clone)]
pub struct Detection {
    pub id: PeerId,
    /// Received signal strength in dBm
    pub rssi: i16,
    pub advertisement: Advertisement,
}

impl Detection {
    pub fn new(id: impl Into<PeerId>, rssi: i16, advertisement: Advertisement) -> Self {
        Self {
            id: id.into(),
            rssi,
            advertisement,
        }
    }
}

/// Tracked state for a live peer.
#[derive(Debug, Clone)]
pub struct PeerRecord {
    pub id: PeerId,
    pub advertisement: Advertisement,
    /// Latest signal-strength sample in dBm
    pub rssi: i16,
    /// Whether the advertisement passed the content filter at registration
    pub qualifying: bool,
    pub first_seen: Instant,
    pub last_seen: Instant,
}

impl PeerRecord {
    /// Serde-facing view of this record, with monotonic timestamps projected
    /// onto wall-clock time relative to `now`.
    pub fn snapshot(&self, now: Instant) -> PeerSnapshot {
        let wall_now = Utc::now();
        let age = |at: Instant| {
            let elapsed = now.saturating_duration_since(at);
            ChronoDuration::from_std(elapsed).unwrap_or_else(|_| ChronoDuration::zero())
        };

        PeerSnapshot {
            id: self.id.clone(),
            name: self.advertisement.name.clone(),
            uri: self.advertisement.uri.clone(),
            rssi: self.rssi,
            tx_power: self.advertisement.tx_power,
            first_seen: wall_now - age(self.first_seen),
            last_seen: wall_now - age(self.last_seen),
        }
    }
}

/// Serializable view of a tracked peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerSnapshot {
    pub id: PeerId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    pub rssi: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_power: Option<i8>,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_id_equality() {
        assert_eq!(PeerId::from("AA:BB:CC:DD:EE:FF"), PeerId::from("AA:BB:CC:DD:EE:FF"));
        assert_ne!(PeerId::from("AA:BB:CC:DD:EE:FF"), PeerId::from("11:22:33:44:55:66"));
    }

    #[test]
    fn test_peer_id_serde_transparent() {
        let id = PeerId::from("AA:BB");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"AA:BB\"");
    }

    #[test]
    fn test_snapshot_serialization_skips_missing_fields() {
        let record = PeerRecord {
            id: PeerId::from("AA:BB"),
            advertisement: Advertisement {
                name: None,
                uri: Some("https://example.com/beacon".to_string()),
                tx_power: None,
            },
            rssi: -60,
            qualifying: true,
            first_seen: Instant::now(),
            last_seen: Instant::now(),
        };

        let json = serde_json::to_string(&record.snapshot(Instant::now())).unwrap();
        assert!(json.contains("\"uri\":\"https://example.com/beacon\""));
        assert!(json.contains("\"rssi\":-60"));
        assert!(!json.contains("\"name\""));
        assert!(!json.contains("\"txPower\""));
    }
}
