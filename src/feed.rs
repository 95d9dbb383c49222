//! Handoff from the satellite feed to the thread that owns the drawing surface.
//!
//! The feed may deliver on any thread; it posts complete snapshots into a
//! channel. The render side drains the channel and keeps only the newest
//! snapshot by `received_at`, since every delivery fully replaces the
//! previous one.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::satellite::SatelliteRecord;

/// A complete satellite set as delivered by the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    satellites: Arc<[SatelliteRecord]>,
    received_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(satellites: Vec<SatelliteRecord>) -> Self {
        Self::at(satellites, Utc::now())
    }

    pub fn at(satellites: Vec<SatelliteRecord>, received_at: DateTime<Utc>) -> Self {
        Self { satellites: satellites.into(), received_at }
    }

    /// Placeholder before the first delivery; older than any real snapshot.
    pub fn empty() -> Self {
        Self::at(Vec::new(), DateTime::<Utc>::MIN_UTC)
    }

    /// Whether this snapshot may replace `current`. Ties go to the later arrival.
    pub fn supersedes(&self, current: &Snapshot) -> bool {
        self.received_at >= current.received_at
    }

    pub fn satellites(&self) -> &[SatelliteRecord] {
        &self.satellites
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }
}

pub fn snapshot_channel() -> (SnapshotSender, SnapshotReceiver) {
    let (tx, rx) = mpsc::channel();
    (SnapshotSender { tx }, SnapshotReceiver { rx })
}

/// Feed side. Cheap to clone and safe to move to the feed's thread.
#[derive(Debug, Clone)]
pub struct SnapshotSender {
    tx: Sender<Snapshot>,
}

impl SnapshotSender {
    /// Returns false once the render side has gone away.
    pub fn post(&self, satellites: Vec<SatelliteRecord>) -> bool {
        self.post_snapshot(Snapshot::new(satellites))
    }

    pub fn post_snapshot(&self, snapshot: Snapshot) -> bool {
        let count = snapshot.len();
        match self.tx.send(snapshot) {
            Ok(()) => {
                debug!("[feed] posted snapshot with {} satellites", count);
                true
            }
            Err(_) => {
                warn!("[feed] render side closed, dropping snapshot with {} satellites", count);
                false
            }
        }
    }
}

/// Render side. Lives on the thread that owns the drawing surface.
#[derive(Debug)]
pub struct SnapshotReceiver {
    rx: Receiver<Snapshot>,
}

impl SnapshotReceiver {
    /// Drains everything pending and returns only the newest snapshot.
    /// A snapshot stamped earlier than one already drained is discarded.
    pub fn latest(&self) -> Option<Snapshot> {
        let mut newest: Option<Snapshot> = None;
        let mut skipped = 0usize;
        loop {
            match self.rx.try_recv() {
                Ok(snapshot) => {
                    let keep = newest.as_ref().map_or(true, |current| snapshot.supersedes(current));
                    if newest.is_some() {
                        skipped += 1;
                    }
                    if keep {
                        newest = Some(snapshot);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if skipped > 0 {
            debug!("[feed] coalesced {} stale snapshots", skipped);
        }
        newest
    }
}
