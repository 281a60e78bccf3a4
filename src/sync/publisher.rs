//! Snapshot Publisher
//!
//! After every mutation and every tick, the full current snapshot is
//! serialized and written under one fixed key, replacing the previous
//! value whole. No diffs, no partial updates.
//!
//! Writes are fire-and-forget from the command path's point of view: a
//! store failure is retried a bounded number of times, logged, and then
//! dropped. The monotone revision stamp lets subscribers discard a stale
//! write that slips through out of order.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::sync::store::SnapshotStore;
use crate::tracker::ranking::RankingEngine;
use crate::tracker::snapshot::Snapshot;
use crate::tracker::state::MatchState;

/// Bounded retry count for a failed store write.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Serializes and publishes snapshots under a fixed key.
pub struct SnapshotPublisher {
    store: Arc<dyn SnapshotStore>,
    key: String,
    revision: u64,
    max_retries: u32,
}

impl SnapshotPublisher {
    /// Create a publisher writing under `key`.
    pub fn new(store: Arc<dyn SnapshotStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            revision: 0,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Override the retry bound (tests exercise the give-up path).
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Revision of the most recent publish attempt.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Project and publish the current state.
    ///
    /// Returns the snapshot that was written (or attempted); the command
    /// path never sees a store failure.
    pub fn publish(&mut self, state: &MatchState, ranking: &RankingEngine) -> Snapshot {
        self.revision += 1;
        let snapshot = Snapshot::project(state, ranking, self.revision);
        let value = snapshot.to_value();

        for attempt in 1..=self.max_retries {
            match self.store.put(&self.key, value.clone()) {
                Ok(()) => {
                    debug!(revision = self.revision, key = %self.key, "snapshot published");
                    return snapshot;
                }
                Err(err) => {
                    warn!(
                        revision = self.revision,
                        attempt,
                        %err,
                        "snapshot publish failed"
                    );
                }
            }
        }
        warn!(
            revision = self.revision,
            key = %self.key,
            "giving up on snapshot publish after {} attempts",
            self.max_retries
        );
        snapshot
    }

    /// Remove the published key entirely.
    ///
    /// Used by match reset: idle displays fall back to their explicit
    /// "no match" state instead of rendering a zeroed snapshot. The
    /// revision counter is NOT reset, so post-reset publishes still rank
    /// above anything a lagging subscriber may have buffered.
    pub fn clear(&mut self) {
        for attempt in 1..=self.max_retries {
            match self.store.remove(&self.key) {
                Ok(()) => {
                    debug!(key = %self.key, "published snapshot cleared");
                    return;
                }
                Err(err) => {
                    warn!(attempt, %err, "snapshot clear failed");
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::store::{MemoryStore, StoreError};
    use parking_lot::Mutex;
    use serde_json::Value;
    use tokio::sync::watch;

    /// Store that fails the first `fail_count` writes.
    struct FlakyStore {
        inner: MemoryStore,
        failures_left: Mutex<u32>,
        attempts: Mutex<u32>,
    }

    impl FlakyStore {
        fn new(fail_count: u32) -> Self {
            Self {
                inner: MemoryStore::new(),
                failures_left: Mutex::new(fail_count),
                attempts: Mutex::new(0),
            }
        }
    }

    impl SnapshotStore for FlakyStore {
        fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
            *self.attempts.lock() += 1;
            let mut left = self.failures_left.lock();
            if *left > 0 {
                *left -= 1;
                return Err(StoreError::Unavailable("connection refused".into()));
            }
            self.inner.put(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }

        fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
            self.inner.get(key)
        }

        fn subscribe(&self, key: &str) -> watch::Receiver<Option<Value>> {
            self.inner.subscribe(key)
        }
    }

    fn tracked_match() -> (MatchState, RankingEngine) {
        let mut state = MatchState::new();
        let mut ranking = RankingEngine::new();
        let id = state
            .add_team("Alpha", None, None, vec!["p1".into()])
            .unwrap();
        ranking.register(id);
        (state, ranking)
    }

    #[test]
    fn test_publish_writes_full_snapshot() {
        let store = Arc::new(MemoryStore::new());
        let mut publisher = SnapshotPublisher::new(store.clone(), "matchData");
        let (state, ranking) = tracked_match();

        let snap = publisher.publish(&state, &ranking);
        assert_eq!(snap.revision, 1);

        let stored = store.get("matchData").unwrap().unwrap();
        assert_eq!(Snapshot::from_value(&stored).unwrap(), snap);
    }

    #[test]
    fn test_revision_is_monotone() {
        let store = Arc::new(MemoryStore::new());
        let mut publisher = SnapshotPublisher::new(store, "matchData");
        let (state, ranking) = tracked_match();

        let r1 = publisher.publish(&state, &ranking).revision;
        let r2 = publisher.publish(&state, &ranking).revision;
        publisher.clear();
        let r3 = publisher.publish(&state, &ranking).revision;
        assert!(r1 < r2 && r2 < r3);
    }

    #[test]
    fn test_clear_removes_key() {
        let store = Arc::new(MemoryStore::new());
        let mut publisher = SnapshotPublisher::new(store.clone(), "matchData");
        let (state, ranking) = tracked_match();

        publisher.publish(&state, &ranking);
        publisher.clear();
        assert_eq!(store.get("matchData").unwrap(), None);
    }

    #[test]
    fn test_retry_recovers_from_transient_failure() {
        let store = Arc::new(FlakyStore::new(2));
        let mut publisher = SnapshotPublisher::new(store.clone(), "matchData");
        let (state, ranking) = tracked_match();

        publisher.publish(&state, &ranking);
        assert_eq!(*store.attempts.lock(), 3);
        assert!(store.get("matchData").unwrap().is_some());
    }

    #[test]
    fn test_gives_up_after_bounded_retries() {
        let store = Arc::new(FlakyStore::new(10));
        let mut publisher =
            SnapshotPublisher::new(store.clone(), "matchData").with_max_retries(3);
        let (state, ranking) = tracked_match();

        // Must not panic or loop forever; the write is simply lost.
        publisher.publish(&state, &ranking);
        assert_eq!(*store.attempts.lock(), 3);
        assert_eq!(store.get("matchData").unwrap(), None);
    }
}
