//! Match-State Core
//!
//! Deterministic tracker logic. No I/O, no clocks, no async: given the
//! same commands and the same number of ticks, these modules produce the
//! same state on any platform.
//!
//! - `state`: teams, players, match clock, all mutations
//! - `ranking`: order list and the alive/eliminated partition
//! - `clock`: the one-second tick over both clock families
//! - `snapshot`: the published projection and its validated decode

pub mod clock;
pub mod ranking;
pub mod snapshot;
pub mod state;

// Re-export key types
pub use ranking::{MoveDirection, RankingEngine};
pub use snapshot::{PlayerSnapshot, Snapshot, TeamSnapshot};
pub use state::{MatchClock, MatchState, MatchStats, Player, Team, TeamId, TrackerError};
