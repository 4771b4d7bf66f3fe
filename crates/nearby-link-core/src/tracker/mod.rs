//! Peer tracking engine.
//!
//! Coordinates periodic scan restarts, TTL expiry sweeps, and debounced
//! enrichment batching over one shared peer registry, and reports found/lost
//! transitions to a single observer.

pub mod config;
pub mod service;

pub use config::{default_config_path, TrackerConfig};
pub use service::PeerTracker;

use std::sync::Arc;

use crate::types::{Advertisement, PeerRecord};

/// Observer of peer lifecycle transitions.
///
/// Required when constructing a [`PeerTracker`]. For any identity, `on_lost`
/// is only ever called after a prior `on_found`, and `on_found` is never
/// called twice while the peer stays live (re-detections are updates, not new
/// found events).
pub trait PeerObserver: Send + Sync {
    fn on_found(&self, peer: &PeerRecord);
    fn on_lost(&self, peer: &PeerRecord);
}

/// Decides which advertisements qualify a peer for tracking.
///
/// Non-qualifying detections are never registered and never reported; the
/// filter is re-evaluated on each detection of an untracked peer.
pub type ContentFilter = Arc<dyn Fn(&Advertisement) -> bool + Send + Sync>;

/// Default filter: a peer qualifies when it broadcasts a content URI.
pub fn default_content_filter() -> ContentFilter {
    Arc::new(|advertisement: &Advertisement| advertisement.uri.is_some())
}
