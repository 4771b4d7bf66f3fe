//! Scan driver boundary.
//!
//! The radio side of peer discovery lives behind [`ScanDriver`] so the
//! tracker can run against the bundled UDP listener, a platform radio
//! binding, or a test double.

pub mod udp;

pub use udp::{parse_advertisement, UdpBeaconDriver, ADVERTISEMENT_PORT};

use tokio::sync::mpsc;

use crate::error::ScanError;
use crate::types::Detection;

/// Channel end a driver feeds raw detections into.
pub type DetectionSink = mpsc::Sender<Detection>;

/// Driver for one scanning radio.
///
/// The tracker restarts the scan on every scan tick: `stop_scan` followed by
/// `start_scan`. Implementations must tolerate that cycle indefinitely and
/// must tolerate `stop_scan` without an active scan. Detections are delivered
/// asynchronously through the sink, arbitrarily many per scan.
pub trait ScanDriver: Send + Sync {
    /// Begin scanning, delivering detections to `sink` until stopped.
    ///
    /// An `Err` is a transient failure: the caller is expected to retry on
    /// its next scan cycle.
    fn start_scan(&self, sink: DetectionSink) -> Result<(), ScanError>;

    /// Halt the active scan, if any, and cancel its outstanding work.
    fn stop_scan(&self);
}
