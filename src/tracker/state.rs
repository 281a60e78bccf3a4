//! Match State Definitions
//!
//! All authoritative state for a tracked match: teams, players, and the
//! match clock. Every mutation in the system goes through the methods on
//! [`MatchState`]; nothing else writes these fields.
//!
//! Uses BTreeMap keyed by monotonically assigned team ids, so iteration
//! order is creation order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// TEAM ID
// =============================================================================

/// Unique, stable team identifier.
///
/// Ids are assigned from a monotone counter at roster time and never
/// reused, so sorting ids reproduces creation order.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// PLAYER STATE
// =============================================================================

/// State of a single rostered player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    /// Display name
    pub name: String,

    /// Kill count; clamped at zero, never negative
    pub kills: u32,

    /// Is the player out of the match?
    pub eliminated: bool,

    /// Seconds survived while alive and running
    pub survival_time: u32,

    /// Gates whether `survival_time` advances on a tick.
    /// Elimination freezes the clock (does not reset it); revival resumes
    /// counting from the frozen value.
    pub running: bool,
}

impl Player {
    /// Create a fresh player in the start-of-match state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kills: 0,
            eliminated: false,
            survival_time: 0,
            running: true,
        }
    }

    /// Add `delta` to the kill count, clamping the result at zero.
    pub fn add_kills(&mut self, delta: i32) {
        self.kills = self.kills.saturating_add_signed(delta);
    }

    /// Set the eliminated flag and freeze or resume the survival clock.
    pub fn set_eliminated(&mut self, value: bool) {
        self.eliminated = value;
        self.running = !value;
    }

    /// Return the player to roster defaults.
    pub fn reset(&mut self) {
        self.kills = 0;
        self.eliminated = false;
        self.survival_time = 0;
        self.running = true;
    }
}

// =============================================================================
// TEAM STATE
// =============================================================================

/// State of a single team and its rostered players.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Team {
    /// Unique team id
    pub id: TeamId,

    /// Team name (never empty)
    pub name: String,

    /// Optional short tag shown next to the name
    pub tag: Option<String>,

    /// Optional logo reference (URL or asset key)
    pub logo: Option<String>,

    /// Team-level eliminated flag.
    ///
    /// Derived bottom-up when a player is eliminated (AND over players),
    /// overwritten top-down when the operator sets team status directly.
    /// Between those two cascade points it is not re-derived.
    pub eliminated: bool,

    /// Ordered roster; players are addressed by index
    pub players: Vec<Player>,
}

impl Team {
    /// Sum of kills across the roster.
    pub fn kill_total(&self) -> u32 {
        self.players.iter().map(|p| p.kills).sum()
    }

    /// Whether any player on the roster is still alive.
    ///
    /// Distinct from the `eliminated` flag: this is always derived, while
    /// the flag only tracks the most recent cascade.
    pub fn any_player_alive(&self) -> bool {
        self.players.iter().any(|p| !p.eliminated)
    }
}

// =============================================================================
// MATCH CLOCK
// =============================================================================

/// Global match clock, owned exclusively by the control surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchClock {
    /// Elapsed seconds
    pub match_time: u32,

    /// Whether the match (and with it every survival clock) is running
    pub running: bool,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised by match-state commands.
///
/// Out-of-range lookups fail loudly instead of silently no-opping, so a
/// mistyped command is visible to the operator and to tests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// No team with the given id.
    #[error("team {0} not found")]
    TeamNotFound(TeamId),

    /// Team exists but has no player at the given roster index.
    #[error("team {team} has no player at index {index}")]
    PlayerNotFound {
        /// Team whose roster was addressed
        team: TeamId,
        /// Offending roster index
        index: usize,
    },

    /// Team name was empty (or whitespace only) at roster time.
    #[error("team name must not be empty")]
    EmptyTeamName,
}

// =============================================================================
// MATCH STATE
// =============================================================================

/// Aggregate counters shown on the operator's top bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchStats {
    /// All rostered players
    pub total_players: usize,
    /// Players not yet eliminated
    pub alive_players: usize,
    /// Teams with at least one alive player
    pub alive_teams: usize,
    /// Kills across every roster
    pub total_kills: u32,
}

/// Complete authoritative state of a tracked match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchState {
    /// Global match clock
    pub clock: MatchClock,

    /// All teams, keyed by id (iteration order == creation order)
    teams: BTreeMap<TeamId, Team>,

    /// Next id to assign
    next_team_id: u32,
}

impl MatchState {
    /// Create an empty match with a stopped clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a team.
    ///
    /// The name must be non-empty after trimming; blank player names are
    /// dropped from the roster, so a team may start with zero players.
    pub fn add_team(
        &mut self,
        name: impl Into<String>,
        tag: Option<String>,
        logo: Option<String>,
        player_names: Vec<String>,
    ) -> Result<TeamId, TrackerError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TrackerError::EmptyTeamName);
        }

        let id = TeamId(self.next_team_id);
        self.next_team_id += 1;

        let players = player_names
            .into_iter()
            .filter(|n| !n.trim().is_empty())
            .map(Player::new)
            .collect();

        self.teams.insert(
            id,
            Team {
                id,
                name,
                tag,
                logo,
                eliminated: false,
                players,
            },
        );
        Ok(id)
    }

    /// Get a team by id.
    pub fn team(&self, id: TeamId) -> Result<&Team, TrackerError> {
        self.teams.get(&id).ok_or(TrackerError::TeamNotFound(id))
    }

    /// Iterate all teams in creation order.
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    /// Number of registered teams.
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Mutable team iteration for the tick pass.
    pub(crate) fn teams_mut(&mut self) -> impl Iterator<Item = &mut Team> {
        self.teams.values_mut()
    }

    /// Team ids in creation order.
    pub fn team_ids(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.teams.keys().copied()
    }

    fn player_mut(&mut self, team: TeamId, index: usize) -> Result<&mut Player, TrackerError> {
        let roster = &mut self
            .teams
            .get_mut(&team)
            .ok_or(TrackerError::TeamNotFound(team))?
            .players;
        roster
            .get_mut(index)
            .ok_or(TrackerError::PlayerNotFound { team, index })
    }

    /// Add `delta` kills to a player, clamping the count at zero.
    pub fn update_kills(
        &mut self,
        team: TeamId,
        index: usize,
        delta: i32,
    ) -> Result<(), TrackerError> {
        self.player_mut(team, index)?.add_kills(delta);
        Ok(())
    }

    /// Set a single player's eliminated flag, then derive the team flag
    /// bottom-up: the team is eliminated once every player is.
    pub fn set_player_eliminated(
        &mut self,
        team: TeamId,
        index: usize,
        value: bool,
    ) -> Result<(), TrackerError> {
        self.player_mut(team, index)?.set_eliminated(value);

        let t = self.teams.get_mut(&team).expect("team checked above");
        t.eliminated = t.players.iter().all(|p| p.eliminated);
        Ok(())
    }

    /// Set a team's eliminated flag directly and cascade it top-down onto
    /// every player.
    ///
    /// Reviving a team this way force-revives players that were eliminated
    /// individually. That mirrors the bottom-up derive in
    /// [`set_player_eliminated`](Self::set_player_eliminated) without
    /// reconciling the two; the conflict is a documented product decision.
    pub fn set_team_eliminated(&mut self, team: TeamId, value: bool) -> Result<(), TrackerError> {
        let t = self
            .teams
            .get_mut(&team)
            .ok_or(TrackerError::TeamNotFound(team))?;
        t.eliminated = value;
        for p in &mut t.players {
            p.set_eliminated(value);
        }
        Ok(())
    }

    /// Top-bar aggregates over the whole match.
    pub fn stats(&self) -> MatchStats {
        MatchStats {
            total_players: self.teams.values().map(|t| t.players.len()).sum(),
            alive_players: self
                .teams
                .values()
                .flat_map(|t| &t.players)
                .filter(|p| !p.eliminated)
                .count(),
            alive_teams: self.teams.values().filter(|t| t.any_player_alive()).count(),
            total_kills: self.teams.values().map(Team::kill_total).sum(),
        }
    }

    /// Return every mutable field to start-of-match defaults.
    ///
    /// Identities (ids, names, tags, logos, roster order) survive; kills,
    /// eliminations, survival clocks, and the match clock do not.
    pub fn reset(&mut self) {
        for team in self.teams.values_mut() {
            team.eliminated = false;
            for p in &mut team.players {
                p.reset();
            }
        }
        self.clock = MatchClock::default();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn two_team_match() -> (MatchState, TeamId, TeamId) {
        let mut state = MatchState::new();
        let a = state
            .add_team(
                "Alpha",
                Some("ALP".into()),
                None,
                vec!["a1".into(), "a2".into()],
            )
            .unwrap();
        let b = state
            .add_team("Bravo", None, Some("logo.png".into()), vec!["b1".into()])
            .unwrap();
        (state, a, b)
    }

    #[test]
    fn test_ids_follow_creation_order() {
        let (state, a, b) = two_team_match();
        assert!(a < b);
        let ids: Vec<_> = state.team_ids().collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut state = MatchState::new();
        assert_eq!(
            state.add_team("   ", None, None, vec![]),
            Err(TrackerError::EmptyTeamName)
        );
        assert_eq!(state.team_count(), 0);
    }

    #[test]
    fn test_blank_player_names_dropped() {
        let mut state = MatchState::new();
        let id = state
            .add_team(
                "Alpha",
                None,
                None,
                vec!["a1".into(), "  ".into(), String::new(), "a2".into()],
            )
            .unwrap();
        let names: Vec<_> = state.team(id).unwrap().players.iter().map(|p| &p.name).collect();
        assert_eq!(names, vec!["a1", "a2"]);
    }

    #[test]
    fn test_kills_clamped_at_zero() {
        let (mut state, a, _) = two_team_match();
        state.update_kills(a, 0, 3).unwrap();
        state.update_kills(a, 0, -5).unwrap();
        assert_eq!(state.team(a).unwrap().players[0].kills, 0);

        state.update_kills(a, 0, 2).unwrap();
        state.update_kills(a, 0, -1).unwrap();
        assert_eq!(state.team(a).unwrap().players[0].kills, 1);
    }

    #[test]
    fn test_unknown_ids_fail_loudly() {
        let (mut state, a, _) = two_team_match();
        let ghost = TeamId(99);
        assert_eq!(
            state.update_kills(ghost, 0, 1),
            Err(TrackerError::TeamNotFound(ghost))
        );
        assert_eq!(
            state.set_player_eliminated(a, 7, true),
            Err(TrackerError::PlayerNotFound { team: a, index: 7 })
        );
        assert_eq!(
            state.set_team_eliminated(ghost, true),
            Err(TrackerError::TeamNotFound(ghost))
        );
    }

    #[test]
    fn test_player_elimination_freezes_clock() {
        let (mut state, a, _) = two_team_match();
        state.player_mut(a, 0).unwrap().survival_time = 42;

        state.set_player_eliminated(a, 0, true).unwrap();
        let p = &state.team(a).unwrap().players[0];
        assert!(p.eliminated);
        assert!(!p.running);
        assert_eq!(p.survival_time, 42);

        // Revival resumes from the frozen value, never from zero
        state.set_player_eliminated(a, 0, false).unwrap();
        let p = &state.team(a).unwrap().players[0];
        assert!(!p.eliminated);
        assert!(p.running);
        assert_eq!(p.survival_time, 42);
    }

    #[test]
    fn test_team_flag_derived_bottom_up() {
        let (mut state, a, _) = two_team_match();
        state.set_player_eliminated(a, 0, true).unwrap();
        assert!(!state.team(a).unwrap().eliminated);

        state.set_player_eliminated(a, 1, true).unwrap();
        assert!(state.team(a).unwrap().eliminated);

        // Reviving one player un-derives the team flag
        state.set_player_eliminated(a, 1, false).unwrap();
        assert!(!state.team(a).unwrap().eliminated);
    }

    #[test]
    fn test_team_cascade_overwrites_players() {
        let (mut state, a, _) = two_team_match();
        state.set_team_eliminated(a, true).unwrap();
        let team = state.team(a).unwrap();
        assert!(team.eliminated);
        assert!(team.players.iter().all(|p| p.eliminated && !p.running));
    }

    #[test]
    fn test_cascade_conflict_force_revives() {
        // One player individually eliminated, then the second goes down,
        // deriving the team flag. Team-level revival brings back BOTH,
        // including the one never explicitly revived. Expected behavior.
        let (mut state, a, _) = two_team_match();
        state.set_player_eliminated(a, 0, true).unwrap();
        state.set_player_eliminated(a, 1, true).unwrap();
        assert!(state.team(a).unwrap().eliminated);

        state.set_team_eliminated(a, false).unwrap();
        let team = state.team(a).unwrap();
        assert!(!team.eliminated);
        assert!(team.players.iter().all(|p| !p.eliminated && p.running));
    }

    #[test]
    fn test_stats() {
        let (mut state, a, b) = two_team_match();
        state.update_kills(a, 0, 4).unwrap();
        state.update_kills(b, 0, 2).unwrap();
        state.set_team_eliminated(b, true).unwrap();

        let stats = state.stats();
        assert_eq!(stats.total_players, 3);
        assert_eq!(stats.alive_players, 2);
        assert_eq!(stats.alive_teams, 1);
        assert_eq!(stats.total_kills, 6);
        assert_eq!(state.team(a).unwrap().kill_total(), 4);
    }

    #[test]
    fn test_reset_restores_defaults_keeps_identity() {
        let (mut state, a, b) = two_team_match();
        state.update_kills(a, 0, 9).unwrap();
        state.set_team_eliminated(b, true).unwrap();
        state.player_mut(a, 1).unwrap().survival_time = 120;
        state.clock = MatchClock {
            match_time: 300,
            running: true,
        };

        state.reset();

        assert_eq!(state.clock, MatchClock::default());
        for team in state.teams() {
            assert!(!team.eliminated);
            for p in &team.players {
                assert_eq!(p.kills, 0);
                assert!(!p.eliminated);
                assert_eq!(p.survival_time, 0);
                assert!(p.running);
            }
        }
        // Identities survive
        assert_eq!(state.team(a).unwrap().name, "Alpha");
        assert_eq!(state.team(b).unwrap().logo.as_deref(), Some("logo.png"));
    }
}
