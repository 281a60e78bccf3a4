//! Dual-Clock Tick
//!
//! One tick == one second. A tick advances the match clock and every
//! eligible survival clock in a single pass; the scheduler that decides
//! *when* ticks happen lives in `control/service.rs`, so everything here
//! is deterministic and directly testable.

use crate::tracker::state::MatchState;

/// Advance all clocks by one second.
///
/// No-op while the match is paused. A player's survival clock advances
/// iff the player is `running` and not `eliminated`; everyone else keeps
/// their frozen value for that tick.
///
/// Returns `true` if the clocks advanced.
pub fn tick(state: &mut MatchState) -> bool {
    if !state.clock.running {
        return false;
    }

    state.clock.match_time += 1;
    for team in state.teams_mut() {
        for p in &mut team.players {
            if p.running && !p.eliminated {
                p.survival_time += 1;
            }
        }
    }
    true
}

/// Render a seconds counter as zero-padded `mm:ss`.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

// =============================================================================
// TESTS
// =============================================================================
