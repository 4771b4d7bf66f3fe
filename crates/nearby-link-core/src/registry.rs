//! Keyed store of live peers.
//!
//! One record per identity. Records are created by `upsert`, refreshed on
//! re-detection, and removed only through `remove_expired`.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::types::{Detection, PeerId, PeerRecord, PeerSnapshot};

/// Mapping from peer identity to its tracked record.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: HashMap<PeerId, PeerRecord>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record for the detection, or refresh the existing one.
    ///
    /// Existing records get the detection's signal sample and advertisement
    /// and a `last_seen` that never moves backwards. Returns the resulting
    /// record and whether it was newly inserted.
    pub fn upsert(&mut self, detection: Detection, qualifying: bool, now: Instant) -> (PeerRecord, bool) {
        match self.peers.get_mut(&detection.id) {
            Some(record) => {
                record.rssi = detection.rssi;
                record.advertisement = detection.advertisement;
                record.last_seen = record.last_seen.max(now);
                (record.clone(), false)
            }
            None => {
                let record = PeerRecord {
                    id: detection.id.clone(),
                    advertisement: detection.advertisement,
                    rssi: detection.rssi,
                    qualifying,
                    first_seen: now,
                    last_seen: now,
                };
                self.peers.insert(detection.id, record.clone());
                (record, true)
            }
        }
    }

    /// Remove and return every record not detected within `threshold` of `now`.
    ///
    /// Returns an empty list when nothing is stale. Callers emit lost events
    /// from the returned records; the registry itself never dispatches.
    pub fn remove_expired(&mut self, now: Instant, threshold: Duration) -> Vec<PeerRecord> {
        let expired: Vec<PeerId> = self
            .peers
            .iter()
            .filter(|(_, record)| now.saturating_duration_since(record.last_seen) >= threshold)
            .map(|(id, _)| id.clone())
            .collect();

        expired
            .into_iter()
            .filter_map(|id| self.peers.remove(&id))
            .collect()
    }

    pub fn get(&self, id: &PeerId) -> Option<&PeerRecord> {
        self.peers.get(id)
    }

    pub fn contains(&self, id: &PeerId) -> bool {
        self.peers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Snapshot all live peers, sorted by identity for stable output.
    pub fn snapshot(&self, now: Instant) -> Vec<PeerSnapshot> {
        let mut peers: Vec<PeerSnapshot> =
            self.peers.values().map(|record| record.snapshot(now)).collect();
        peers.sort_by(|a, b| a.id.cmp(&b.id));
        peers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Advertisement;

    fn detection(id: &str, rssi: i16) -> Detection {
        Detection::new(
            id,
            rssi,
            Advertisement {
                name: Some(id.to_string()),
                uri: Some(format!("https://example.com/{}", id)),
                tx_power: None,
            },
        )
    }

    #[test]
    fn test_upsert_inserts_new_peer() {
        let mut registry = PeerRegistry::new();
        let now = Instant::now();

        let (record, is_new) = registry.upsert(detection("AA:BB", -60), true, now);

        assert!(is_new);
        assert_eq!(record.rssi, -60);
        assert_eq!(record.first_seen, now);
        assert_eq!(record.last_seen, now);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_upsert_refreshes_existing_peer() {
        let mut registry = PeerRegistry::new();
        let t0 = Instant::now();
        registry.upsert(detection("AA:BB", -60), true, t0);

        let t1 = t0 + Duration::from_secs(2);
        let (record, is_new) = registry.upsert(detection("AA:BB", -45), true, t1);

        assert!(!is_new);
        assert_eq!(record.rssi, -45);
        assert_eq!(record.first_seen, t0);
        assert_eq!(record.last_seen, t1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_no_duplicate_identities() {
        let mut registry = PeerRegistry::new();
        let now = Instant::now();

        for i in 0..10i16 {
            registry.upsert(detection("AA:BB", -60 - i), true, now + Duration::from_millis(i as u64));
            registry.upsert(detection("CC:DD", -70), true, now);
        }

        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_last_seen_never_moves_backwards() {
        let mut registry = PeerRegistry::new();
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(5);

        registry.upsert(detection("AA:BB", -60), true, t1);
        let (record, _) = registry.upsert(detection("AA:BB", -50), true, t0);

        assert_eq!(record.last_seen, t1);
    }

    #[test]
    fn test_remove_expired_at_threshold_boundary() {
        let mut registry = PeerRegistry::new();
        let t0 = Instant::now();
        let threshold = Duration::from_secs(10);

        registry.upsert(detection("gone", -80), true, t0);
        registry.upsert(detection("alive", -60), true, t0 + Duration::from_millis(1));

        // Exactly at the threshold: "gone" qualifies, "alive" is 1ms short.
        let removed = registry.remove_expired(t0 + threshold, threshold);

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, PeerId::from("gone"));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&PeerId::from("alive")));
    }

    #[test]
    fn test_remove_expired_empty_when_all_fresh() {
        let mut registry = PeerRegistry::new();
        let now = Instant::now();
        registry.upsert(detection("AA:BB", -60), true, now);

        let removed = registry.remove_expired(now + Duration::from_secs(1), Duration::from_secs(10));

        assert!(removed.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_expired_removes_all_stale() {
        let mut registry = PeerRegistry::new();
        let t0 = Instant::now();

        registry.upsert(detection("a", -60), true, t0);
        registry.upsert(detection("b", -70), true, t0);
        registry.upsert(detection("c", -50), true, t0 + Duration::from_secs(8));

        let removed = registry.remove_expired(t0 + Duration::from_secs(10), Duration::from_secs(10));

        let mut ids: Vec<String> = removed.iter().map(|r| r.id.to_string()).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_sorted_by_identity() {
        let mut registry = PeerRegistry::new();
        let now = Instant::now();
        registry.upsert(detection("zz", -60), true, now);
        registry.upsert(detection("aa", -70), true, now);
        registry.upsert(detection("mm", -50), true, now);

        let snapshot = registry.snapshot(now);
        let ids: Vec<String> = snapshot.iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, vec!["aa", "mm", "zz"]);
    }
}
