//! # Scorecast Server
//!
//! Authoritative match-state tracker for live tournament broadcast overlays.
//! One operator (the control surface) records kills and eliminations; any
//! number of read-only display surfaces mirror the published ranking and
//! clocks.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SCORECAST SERVER                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  tracker/        - Match-state core (deterministic)          │
//! │  ├── state.rs    - Teams, players, clocks, mutations         │
//! │  ├── ranking.rs  - Order list + alive/eliminated partition   │
//! │  ├── clock.rs    - Per-second tick over match/survival clocks│
//! │  └── snapshot.rs - Published projection + validated decode   │
//! │                                                              │
//! │  sync/           - Replication (non-deterministic)           │
//! │  ├── store.rs    - Key-addressed store with change watch     │
//! │  ├── publisher.rs- Full-snapshot writes under one fixed key  │
//! │  └── subscriber.rs- Display mirror, whole-state replacement  │
//! │                                                              │
//! │  control/        - Writer role                               │
//! │  ├── surface.rs  - Command handlers: mutate → rank → publish │
//! │  └── service.rs  - Async front + armed/cancelled tick loop   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency Model
//!
//! The shared store is the only cross-surface channel. Snapshots are
//! replaced whole under one key: last writer wins, delivery is at most
//! once, and a subscriber that was offline observes only the final value
//! on reconnect. The `tracker/` module performs no I/O and is fully
//! deterministic; everything time- or transport-dependent lives in
//! `sync/` and `control/`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod control;
pub mod sync;
pub mod tracker;

// Re-export commonly used types
pub use control::service::ControlService;
pub use control::surface::{ControlSurface, ResetGate};
pub use sync::publisher::SnapshotPublisher;
pub use sync::store::{MemoryStore, SnapshotStore};
pub use sync::subscriber::{DisplayState, DisplaySurface};
pub use tracker::ranking::{MoveDirection, RankingEngine};
pub use tracker::snapshot::Snapshot;
pub use tracker::state::{MatchState, Player, Team, TeamId, TrackerError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Clock granularity: both the match clock and the per-player survival
/// clocks advance in whole seconds.
pub const TICK_SECONDS: u64 = 1;

/// The fixed, well-known key every snapshot is published under.
pub const SNAPSHOT_KEY: &str = "matchData";
