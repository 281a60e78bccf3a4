//! Published Snapshot
//!
//! The externally replicated projection of match state: the ranked team
//! list plus the match clock, rebuilt in full on every mutation. This is
//! the only durable contract between the control surface and displays.
//!
//! Wire field names are camelCase (`matchTime`, `survivalTime`) and a
//! player's `running` flag stays internal — displays only need the frozen
//! survival value and the eliminated flag.

use serde::{Deserialize, Serialize};

use crate::tracker::ranking::RankingEngine;
use crate::tracker::state::{MatchState, TeamId};

/// Published view of a single player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    /// Display name
    pub name: String,
    /// Kill count
    pub kills: u32,
    /// Out of the match?
    pub eliminated: bool,
    /// Seconds survived (frozen at elimination)
    pub survival_time: u32,
}

/// Published view of a single team, in display rank order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSnapshot {
    /// Stable team id
    pub id: TeamId,
    /// Team name
    pub name: String,
    /// Logo reference, omitted from the wire when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Team-level eliminated flag
    pub eliminated: bool,
    /// Roster in roster order
    pub players: Vec<PlayerSnapshot>,
}

/// The full replicated unit: ranked teams plus the match clock.
///
/// `revision` increases monotonically across publishes (it survives a
/// match reset) so a subscriber can drop a stale write that arrives after
/// a newer one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Monotone publish counter
    pub revision: u64,
    /// Teams in display order: alive block first, then eliminated
    pub teams: Vec<TeamSnapshot>,
    /// Match clock, elapsed seconds
    pub match_time: u32,
}

impl Snapshot {
    /// Project the current state through the ranking engine.
    pub fn project(state: &MatchState, ranking: &RankingEngine, revision: u64) -> Self {
        let teams = ranking
            .display_order(state)
            .into_iter()
            .map(|t| TeamSnapshot {
                id: t.id,
                name: t.name.clone(),
                logo: t.logo.clone(),
                eliminated: t.eliminated,
                players: t
                    .players
                    .iter()
                    .map(|p| PlayerSnapshot {
                        name: p.name.clone(),
                        kills: p.kills,
                        eliminated: p.eliminated,
                        survival_time: p.survival_time,
                    })
                    .collect(),
            })
            .collect();

        Self {
            revision,
            teams,
            match_time: state.clock.match_time,
        }
    }

    /// Serialize for the store.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("snapshot types serialize infallibly")
    }

    /// Validated decode at the ingestion boundary.
    ///
    /// A payload that does not match the wire shape is an error; the
    /// subscriber decides what to fall back to.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::state::MatchState;

    fn tracked_match() -> (MatchState, RankingEngine) {
        let mut state = MatchState::new();
        let mut ranking = RankingEngine::new();
        for (name, logo) in [("Alpha", Some("alpha.png")), ("Bravo", None)] {
            let id = state
                .add_team(name, None, logo.map(String::from), vec!["p1".into()])
                .unwrap();
            ranking.register(id);
        }
        (state, ranking)
    }

    #[test]
    fn test_projection_follows_display_order() {
        let (mut state, ranking) = tracked_match();
        let alpha = state.team_ids().next().unwrap();
        state.set_team_eliminated(alpha, true).unwrap();
        state.clock.match_time = 17;

        let snap = Snapshot::project(&state, &ranking, 3);
        assert_eq!(snap.revision, 3);
        assert_eq!(snap.match_time, 17);
        let names: Vec<_> = snap.teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Bravo", "Alpha"]);
        assert!(snap.teams[1].eliminated);
    }

    #[test]
    fn test_wire_shape_field_names() {
        let (mut state, ranking) = tracked_match();
        state.clock.match_time = 61;
        let alpha = state.team_ids().next().unwrap();
        state.update_kills(alpha, 0, 2).unwrap();

        let value = Snapshot::project(&state, &ranking, 1).to_value();
        assert_eq!(value["matchTime"], 61);
        assert_eq!(value["teams"][0]["players"][0]["survivalTime"], 0);
        assert_eq!(value["teams"][0]["players"][0]["kills"], 2);
        // running is internal state and never published
        assert!(value["teams"][0]["players"][0].get("running").is_none());
        // absent logo is omitted, not null
        assert!(value["teams"][1].get("logo").is_none());
        assert_eq!(value["teams"][0]["logo"], "alpha.png");
    }

    #[test]
    fn test_round_trip_through_store_value() {
        let (state, ranking) = tracked_match();
        let snap = Snapshot::project(&state, &ranking, 9);
        let back = Snapshot::from_value(&snap.to_value()).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_malformed_payload_rejected() {
        let junk = serde_json::json!({ "teams": "not-a-list", "matchTime": 0 });
        assert!(Snapshot::from_value(&junk).is_err());

        let missing = serde_json::json!({ "revision": 1, "teams": [] });
        assert!(Snapshot::from_value(&missing).is_err());

        let wrong_type = serde_json::json!({
            "revision": 1,
            "teams": [{ "id": "three", "name": "X", "eliminated": false, "players": [] }],
            "matchTime": 5
        });
        assert!(Snapshot::from_value(&wrong_type).is_err());
    }
}
