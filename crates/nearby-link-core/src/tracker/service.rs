//! Peer tracking actor.
//!
//! One task owns the registry and the pending enrichment set. Scan restarts,
//! expiry sweeps, debounce flushes, and detection intake are all branches of
//! the same `select!` loop, so no two mutations ever interleave partially and
//! "debounce armed" can never drift apart from "pending set non-empty".

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use super::config::TrackerConfig;
use super::{ContentFilter, PeerObserver};
use crate::enrich::MetadataResolver;
use crate::registry::PeerRegistry;
use crate::scan::{DetectionSink, ScanDriver};
use crate::types::{Detection, PeerId, PeerSnapshot};

const DETECTION_QUEUE: usize = 256;
const COMMAND_QUEUE: usize = 16;

enum Command {
    TriggerScan,
    Inject(Detection),
    Peers(oneshot::Sender<Vec<PeerSnapshot>>),
}

/// Handle to a running peer tracker.
///
/// [`PeerTracker::start`] spawns the tracking task and returns the running
/// handle; [`PeerTracker::stop`] consumes it. Double-start and
/// stop-without-start are unrepresentable.
pub struct PeerTracker {
    commands: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl PeerTracker {
    /// Spawn the tracking task and begin scanning immediately.
    ///
    /// The first scan restart and expiry sweep run right away; afterwards
    /// each repeats at its configured period.
    pub fn start(
        config: TrackerConfig,
        driver: Arc<dyn ScanDriver>,
        filter: ContentFilter,
        resolver: Arc<dyn MetadataResolver>,
        observer: Arc<dyn PeerObserver>,
    ) -> Self {
        let (detections_tx, detections_rx) = mpsc::channel(DETECTION_QUEUE);
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_QUEUE);

        let task = TrackerTask {
            config,
            driver,
            filter,
            resolver,
            observer,
            registry: PeerRegistry::new(),
            pending: HashSet::new(),
            debounce_deadline: None,
            detections_tx,
            detections_rx,
            commands: commands_rx,
        };

        Self {
            commands: commands_tx,
            task: tokio::spawn(task.run()),
        }
    }

    /// Force one scan restart without waiting for the next scheduled tick.
    pub async fn trigger_scan(&self) {
        let _ = self.commands.send(Command::TriggerScan).await;
    }

    /// Feed a synthetic detection, bypassing the scan driver.
    pub async fn inject(&self, detection: Detection) {
        let _ = self.commands.send(Command::Inject(detection)).await;
    }

    /// Snapshot of all currently live peers, sorted by identity.
    pub async fn peers(&self) -> Vec<PeerSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let _ = self.commands.send(Command::Peers(reply_tx)).await;
        reply_rx.await.unwrap_or_default()
    }

    /// Stop scanning and shut the tracker down.
    ///
    /// When this returns, no further found/lost events or enrichment batches
    /// are dispatched. An enrichment request already in flight is not
    /// cancelled and may still complete.
    pub async fn stop(self) {
        drop(self.commands);
        let _ = self.task.await;
    }
}

struct TrackerTask {
    config: TrackerConfig,
    driver: Arc<dyn ScanDriver>,
    filter: ContentFilter,
    resolver: Arc<dyn MetadataResolver>,
    observer: Arc<dyn PeerObserver>,
    registry: PeerRegistry,
    pending: HashSet<PeerId>,
    debounce_deadline: Option<Instant>,
    detections_tx: DetectionSink,
    detections_rx: mpsc::Receiver<Detection>,
    commands: mpsc::Receiver<Command>,
}

impl TrackerTask {
    async fn run(mut self) {
        let mut scan_tick = time::interval(self.config.scan_period());
        let mut expiry_tick = time::interval(self.config.expiry_period());

        loop {
            tokio::select! {
                _ = scan_tick.tick() => self.restart_scan(),
                _ = expiry_tick.tick() => self.sweep(),
                Some(detection) = self.detections_rx.recv() => self.handle_detection(detection),
                _ = wait_until(self.debounce_deadline), if self.debounce_deadline.is_some() => {
                    self.flush_pending();
                }
                command = self.commands.recv() => match command {
                    Some(Command::TriggerScan) => self.restart_scan(),
                    Some(Command::Inject(detection)) => self.handle_detection(detection),
                    Some(Command::Peers(reply)) => {
                        let _ = reply.send(self.registry.snapshot(Instant::now()));
                    }
                    None => break,
                },
            }
        }

        self.driver.stop_scan();
    }

    /// Stop any active scan and start a fresh one, so scan handles never
    /// accumulate or leak. A failed start is retried on the next tick.
    fn restart_scan(&self) {
        self.driver.stop_scan();

        if let Err(e) = self.driver.start_scan(self.detections_tx.clone()) {
            tracing::warn!(error = %e, "scan start failed, retrying on next tick");
        }
    }

    fn handle_detection(&mut self, detection: Detection) {
        let now = Instant::now();
        let qualifying = (self.filter)(&detection.advertisement);

        // Untracked peers that don't qualify are never registered; the filter
        // runs again from scratch on their next detection.
        if !self.registry.contains(&detection.id) && !qualifying {
            return;
        }

        let (record, is_new) = self.registry.upsert(detection, qualifying, now);

        if is_new {
            tracing::debug!(id = %record.id, rssi = record.rssi, "peer found");
            self.pending.insert(record.id.clone());
            if self.debounce_deadline.is_none() {
                self.debounce_deadline = Some(now + self.config.debounce_period());
            }
            self.observer.on_found(&record);
        }
    }

    fn sweep(&mut self) {
        let removed = self
            .registry
            .remove_expired(Instant::now(), self.config.inactivity_threshold());

        for record in &removed {
            self.pending.remove(&record.id);
            tracing::debug!(id = %record.id, "peer lost");
            self.observer.on_lost(record);
        }

        if self.pending.is_empty() {
            self.debounce_deadline = None;
        }
    }

    fn flush_pending(&mut self) {
        self.debounce_deadline = None;
        let now = Instant::now();

        let mut batch: Vec<PeerSnapshot> = self
            .pending
            .drain()
            .filter_map(|id| self.registry.get(&id).map(|record| record.snapshot(now)))
            .collect();
        batch.sort_by(|a, b| a.id.cmp(&b.id));

        if batch.is_empty() {
            return;
        }

        tracing::debug!(count = batch.len(), "dispatching enrichment batch");
        tokio::spawn(self.resolver.resolve_batch(batch));
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
