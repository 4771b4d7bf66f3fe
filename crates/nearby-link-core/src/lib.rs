//! NearbyLink core library.
//!
//! Tracks transient wireless beacon peers: periodic scan restarts through a
//! pluggable driver, TTL expiry sweeps over a shared registry, debounced
//! batching of newly-found peers into enrichment requests, and found/lost
//! events to a single observer.

pub mod enrich;
pub mod error;
pub mod registry;
pub mod scan;
pub mod tracker;
pub mod types;

pub use enrich::{HttpResolver, MetadataResolver, NoopResolver};
pub use error::{ConfigError, CoreError, Result, ScanError};
pub use registry::PeerRegistry;
pub use scan::{ScanDriver, UdpBeaconDriver, ADVERTISEMENT_PORT};
pub use tracker::{
    default_config_path, default_content_filter, ContentFilter, PeerObserver, PeerTracker,
    TrackerConfig,
};
pub use types::{Advertisement, Detection, PeerId, PeerRecord, PeerSnapshot};
