//! Partition Ranking Engine
//!
//! Derives the display order from the manually controlled order list plus
//! the teams' current eliminated flags. The order list is the only ranking
//! signal the operator edits; elimination transitions never touch it.
//!
//! Display order is a stable partition of the order list: alive teams
//! first, eliminated teams second, each block preserving relative order.

use crate::tracker::state::{MatchState, Team, TeamId, TrackerError};

/// Direction for a manual move within a partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    /// Toward rank 1
    Up,
    /// Away from rank 1
    Down,
}

/// Holds the order list and answers ranking queries.
///
/// Pure with respect to entity state: every query takes the current
/// [`MatchState`] by reference, so identical (order list, eliminated
/// flags) inputs always produce identical output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RankingEngine {
    /// Permutation of the full current team-id set
    order: Vec<TeamId>,
}

impl RankingEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a newly rostered team at the bottom of the order list.
    pub fn register(&mut self, id: TeamId) {
        if !self.order.contains(&id) {
            self.order.push(id);
        }
    }

    /// The raw order list (a permutation of the registered team ids).
    pub fn order(&self) -> &[TeamId] {
        &self.order
    }

    /// Swap `id` with its immediate neighbor inside its own partition.
    ///
    /// The partition is whichever of alive/eliminated the team currently
    /// belongs to; neighbors in the other partition are never touched, and
    /// a move at a partition boundary is a no-op. Afterwards the order
    /// list is rewritten as alive block first, eliminated block second.
    ///
    /// Returns `true` if the order list changed.
    pub fn move_team(
        &mut self,
        id: TeamId,
        dir: MoveDirection,
        state: &MatchState,
    ) -> Result<bool, TrackerError> {
        state.team(id)?;

        let (mut alive, mut eliminated) = self.split_partitions(state);
        let partition = if state.team(id)?.eliminated {
            &mut eliminated
        } else {
            &mut alive
        };

        let pos = match partition.iter().position(|t| *t == id) {
            Some(p) => p,
            // Registered but missing from the list; nothing to move.
            None => return Ok(false),
        };

        let moved = match dir {
            MoveDirection::Up if pos > 0 => {
                partition.swap(pos - 1, pos);
                true
            }
            MoveDirection::Down if pos + 1 < partition.len() => {
                partition.swap(pos, pos + 1);
                true
            }
            _ => false,
        };

        if moved {
            alive.extend(eliminated);
            self.order = alive;
        }
        Ok(moved)
    }

    /// The canonical ranking: alive teams first, then eliminated, each
    /// block in order-list order. This is what the operator sees and what
    /// gets published.
    pub fn display_order<'a>(&self, state: &'a MatchState) -> Vec<&'a Team> {
        let (alive, eliminated) = self.split_partitions(state);
        alive
            .into_iter()
            .chain(eliminated)
            .filter_map(|id| state.team(id).ok())
            .collect()
    }

    /// Restore the creation-time ordering.
    ///
    /// Ids are assigned monotonically at roster time, so sorting the list
    /// reproduces the original sequence.
    pub fn reset(&mut self) {
        self.order.sort_unstable();
    }

    /// Filter the order list by each team's eliminated flag, preserving
    /// relative order within both partitions.
    fn split_partitions(&self, state: &MatchState) -> (Vec<TeamId>, Vec<TeamId>) {
        let mut alive = Vec::with_capacity(self.order.len());
        let mut eliminated = Vec::new();
        for &id in &self.order {
            match state.team(id) {
                Ok(t) if t.eliminated => eliminated.push(id),
                Ok(_) => alive.push(id),
                // Unknown id in the list: skip rather than poison ranking.
                Err(_) => {}
            }
        }
        (alive, eliminated)
    }
}

// =============================================================================
// TESTS
// =============================================================================
