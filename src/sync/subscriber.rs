//! Display-Surface Subscriber
//!
//! The read side of replication. A display surface holds whatever
//! snapshot it last accepted and nothing else; every accepted change
//! replaces that state whole. There is no merge logic, no write path,
//! and applying a snapshot must be safe at any moment, including
//! mid-match.
//!
//! Failure policy: a missing key or a malformed payload renders as the
//! explicit empty state (no teams, clock at zero). A rendering surface
//! never propagates a decode failure.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::sync::store::SnapshotStore;
use crate::tracker::snapshot::{Snapshot, TeamSnapshot};

/// Everything a display needs to render, replaced whole on each update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayState {
    /// Ranked teams from the last accepted snapshot
    pub teams: Vec<TeamSnapshot>,
    /// Match clock from the last accepted snapshot
    pub match_time: u32,
}

impl DisplayState {
    /// True when no snapshot is being mirrored (pre-match, post-reset, or
    /// after a malformed payload).
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty() && self.match_time == 0
    }
}

/// A read-only mirror of the published snapshot key.
pub struct DisplaySurface {
    rx: watch::Receiver<Option<Value>>,
    state: DisplayState,
    last_revision: u64,
}

impl DisplaySurface {
    /// Subscribe to `key` and mirror its current value immediately.
    pub fn new(store: &Arc<dyn SnapshotStore>, key: &str) -> Self {
        let rx = store.subscribe(key);
        let current = rx.borrow().clone();
        let mut surface = Self {
            rx,
            state: DisplayState::default(),
            last_revision: 0,
        };
        surface.apply(current.as_ref());
        surface
    }

    /// The current render state.
    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Apply one observed store value.
    ///
    /// `None` (key absent) and undecodable payloads both fall open to the
    /// empty state. A snapshot whose revision is not newer than the last
    /// accepted one is dropped.
    pub fn apply(&mut self, value: Option<&Value>) {
        let Some(value) = value else {
            self.state = DisplayState::default();
            self.last_revision = 0;
            debug!("snapshot key cleared; showing empty state");
            return;
        };

        match Snapshot::from_value(value) {
            Ok(snapshot) => {
                if snapshot.revision <= self.last_revision {
                    debug!(
                        stale = snapshot.revision,
                        current = self.last_revision,
                        "dropping stale snapshot"
                    );
                    return;
                }
                self.last_revision = snapshot.revision;
                self.state = DisplayState {
                    teams: snapshot.teams,
                    match_time: snapshot.match_time,
                };
            }
            Err(err) => {
                warn!(%err, "malformed snapshot; falling back to empty state");
                self.state = DisplayState::default();
            }
        }
    }

    /// Mirror the key until the store side goes away.
    ///
    /// Each wakeup observes only the latest value; intermediate writes
    /// that happened while this task was behind are unrecoverable, by
    /// design.
    pub async fn run(mut self) {
        while self.rx.changed().await.is_ok() {
            let value = self.rx.borrow_and_update().clone();
            self.apply(value.as_ref());
        }
    }

    /// One step of [`run`](Self::run): wait for the next change and apply
    /// it. Returns `false` once the store side is gone.
    pub async fn next_change(&mut self) -> bool {
        if self.rx.changed().await.is_err() {
            return false;
        }
        let value = self.rx.borrow_and_update().clone();
        self.apply(value.as_ref());
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
