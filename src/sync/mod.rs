//! Replication Layer
//!
//! Keeps display surfaces eventually consistent with the control surface.
//! The model is deliberately thin: one logical writer, one fixed key,
//! full-snapshot replacement, last writer wins. Everything in this module
//! is **non-deterministic**; tracker logic never lives here.

pub mod publisher;
pub mod store;
pub mod subscriber;

pub use publisher::SnapshotPublisher;
pub use store::{MemoryStore, SnapshotStore, StoreError};
pub use subscriber::{DisplayState, DisplaySurface};
