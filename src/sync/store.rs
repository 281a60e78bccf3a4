//! Key-Addressed Shared Store
//!
//! The one cross-surface resource: a store that can set a full value under
//! a key, remove it, and notify watchers of changes. There is no
//! transaction or locking discipline on top; concurrent writers race at
//! last-write-wins granularity by design.
//!
//! Change notification uses `tokio::sync::watch`, which delivers at most
//! once per observed change and always the latest value, so a watcher that
//! was away through several writes sees only the final one.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::watch;

/// Store failures.
///
/// The in-memory store never fails; the variants exist so remote-backed
/// implementations can surface transport trouble to the publisher's retry
/// loop.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A key-addressed store with full-value replacement and change watch.
///
/// `subscribe` hands out a receiver whose current value is the key's
/// current value; `None` means the key is absent (never written, or
/// removed).
pub trait SnapshotStore: Send + Sync {
    /// Replace the full value under `key`.
    fn put(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove `key`, notifying watchers with `None`.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Read the current value under `key`.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Watch `key` for changes.
    fn subscribe(&self, key: &str) -> watch::Receiver<Option<Value>>;
}

/// In-process store backed by one watch channel per key.
///
/// Stands in for a real replicated store during matches run from a single
/// host, and for every test.
#[derive(Default)]
pub struct MemoryStore {
    keys: Mutex<BTreeMap<String, watch::Sender<Option<Value>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn sender(&self, key: &str) -> watch::Sender<Option<Value>> {
        let mut keys = self.keys.lock();
        keys.entry(key.to_string())
            .or_insert_with(|| watch::channel(None).0)
            .clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.sender(key).send_replace(Some(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.sender(key).send_replace(None);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.sender(key).borrow().clone())
    }

    fn subscribe(&self, key: &str) -> watch::Receiver<Option<Value>> {
        self.sender(key).subscribe()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.put("k", json!({"a": 1})).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!({"a": 1})));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_keys_are_independent() {
        let store = MemoryStore::new();
        store.put("a", json!(1)).unwrap();
        store.put("b", json!(2)).unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.get("b").unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_watcher_notified_of_change() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe("k");
        assert_eq!(*rx.borrow(), None);

        store.put("k", json!(7)).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Some(json!(7)));

        store.remove("k").unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), None);
    }

    #[tokio::test]
    async fn test_slow_watcher_sees_only_final_write() {
        // At-most-once, last-writer-wins: rapid successive writes collapse
        // to whatever is current when the watcher catches up.
        let store = MemoryStore::new();
        let mut rx = store.subscribe("k");

        for i in 0..10 {
            store.put("k", json!(i)).unwrap();
        }
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Some(json!(9)));

        // No second notification pending
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_late_subscriber_gets_current_value() {
        let store = MemoryStore::new();
        store.put("k", json!("live")).unwrap();
        let rx = store.subscribe("k");
        assert_eq!(*rx.borrow(), Some(json!("live")));
    }
}
