//! Control Surface
//!
//! The single logical writer. Every operator command mutates the entity
//! store (and/or the order list), then synchronously recomputes and
//! publishes the snapshot. There is no implicit dependency tracking:
//! commands call publish themselves, in order, to completion.

use tracing::info;

use crate::sync::publisher::SnapshotPublisher;
use crate::tracker::clock;
use crate::tracker::ranking::{MoveDirection, RankingEngine};
use crate::tracker::state::{MatchState, TeamId, TrackerError};

/// Human-in-the-loop confirmation for destructive operations.
///
/// `resetMatch` is the only caller today. Implemented for any
/// `Fn(&str) -> bool`, so tests and the demo binary pass closures.
pub trait ResetGate: Send + Sync {
    /// Show `prompt` to the operator; `true` proceeds, `false` aborts.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> ResetGate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Prompt shown before a destructive match reset.
pub const RESET_PROMPT: &str =
    "Are you sure you want to reset the match? This clears kills, eliminations, and timers.";

/// Owns the authoritative state and the publish pipeline.
///
/// Commands run synchronously to completion with no overlap; the async
/// front in `control/service.rs` serializes access.
pub struct ControlSurface {
    state: MatchState,
    ranking: RankingEngine,
    publisher: SnapshotPublisher,
}

impl ControlSurface {
    /// Create an empty match wired to `publisher`.
    pub fn new(publisher: SnapshotPublisher) -> Self {
        Self {
            state: MatchState::new(),
            ranking: RankingEngine::new(),
            publisher,
        }
    }

    /// Read access to the authoritative state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Read access to the ranking engine.
    pub fn ranking(&self) -> &RankingEngine {
        &self.ranking
    }

    /// Register a team and rank it last.
    pub fn add_team(
        &mut self,
        name: impl Into<String>,
        tag: Option<String>,
        logo: Option<String>,
        player_names: Vec<String>,
    ) -> Result<TeamId, TrackerError> {
        let id = self.state.add_team(name, tag, logo, player_names)?;
        self.ranking.register(id);
        info!(team = %id, "team added");
        self.publisher.publish(&self.state, &self.ranking);
        Ok(id)
    }

    /// Move a team one rank within its partition.
    pub fn move_team(&mut self, id: TeamId, dir: MoveDirection) -> Result<bool, TrackerError> {
        let moved = self.ranking.move_team(id, dir, &self.state)?;
        if moved {
            self.publisher.publish(&self.state, &self.ranking);
        }
        Ok(moved)
    }

    /// Adjust a player's kill count (clamped at zero).
    pub fn update_kills(
        &mut self,
        team: TeamId,
        player: usize,
        delta: i32,
    ) -> Result<(), TrackerError> {
        self.state.update_kills(team, player, delta)?;
        self.publisher.publish(&self.state, &self.ranking);
        Ok(())
    }

    /// Eliminate or revive a single player (team flag re-derived).
    pub fn set_player_eliminated(
        &mut self,
        team: TeamId,
        player: usize,
        value: bool,
    ) -> Result<(), TrackerError> {
        self.state.set_player_eliminated(team, player, value)?;
        info!(team = %team, player, eliminated = value, "player status changed");
        self.publisher.publish(&self.state, &self.ranking);
        Ok(())
    }

    /// Eliminate or revive a whole team (cascades onto every player).
    pub fn set_team_eliminated(&mut self, team: TeamId, value: bool) -> Result<(), TrackerError> {
        self.state.set_team_eliminated(team, value)?;
        info!(team = %team, eliminated = value, "team status changed");
        self.publisher.publish(&self.state, &self.ranking);
        Ok(())
    }

    /// Start the match clock. Returns `true` if it was stopped.
    pub fn start(&mut self) -> bool {
        if self.state.clock.running {
            return false;
        }
        self.state.clock.running = true;
        info!(match_time = self.state.clock.match_time, "match started");
        self.publisher.publish(&self.state, &self.ranking);
        true
    }

    /// Pause the match clock. Returns `true` if it was running.
    pub fn pause(&mut self) -> bool {
        if !self.state.clock.running {
            return false;
        }
        self.state.clock.running = false;
        info!(match_time = self.state.clock.match_time, "match paused");
        self.publisher.publish(&self.state, &self.ranking);
        true
    }

    /// Advance both clock families by one second and republish.
    ///
    /// No-op (and no publish) while paused. Called by the tick scheduler,
    /// never by operator commands.
    pub fn tick(&mut self) -> bool {
        let advanced = clock::tick(&mut self.state);
        if advanced {
            self.publisher.publish(&self.state, &self.ranking);
        }
        advanced
    }

    /// Destructive full reset behind a confirmation gate.
    ///
    /// Declining leaves every piece of state untouched. On confirmation:
    /// players and teams return to roster defaults, the order list returns
    /// to creation order, both clocks stop at zero, and the published key
    /// is *removed* so idle displays show their explicit no-match state.
    ///
    /// Returns `true` if the reset happened.
    pub fn reset_match(&mut self, gate: &dyn ResetGate) -> bool {
        if !gate.confirm(RESET_PROMPT) {
            info!("match reset declined");
            return false;
        }
        self.state.reset();
        self.ranking.reset();
        self.publisher.clear();
        info!("match reset");
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
