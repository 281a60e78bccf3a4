//! Scorecast Server
//!
//! Demo driver: stands up the shared store, a control surface, and a
//! display surface, then runs a short scripted match so the whole
//! mutate → rank → publish → mirror pipeline can be watched in the logs.

use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use scorecast::control::service::{ControlService, TrackerConfig};
use scorecast::sync::store::{MemoryStore, SnapshotStore};
use scorecast::sync::subscriber::DisplaySurface;
use scorecast::tracker::clock::format_clock;
use scorecast::tracker::ranking::MoveDirection;
use scorecast::{SNAPSHOT_KEY, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Scorecast Server v{}", VERSION);
    info!("Snapshot key: {}", SNAPSHOT_KEY);

    demo_match().await
}

/// Run a scripted match end to end.
async fn demo_match() -> anyhow::Result<()> {
    info!("=== Starting Demo Match ===");

    let store: Arc<dyn SnapshotStore> = Arc::new(MemoryStore::new());
    let mut service = ControlService::new(store.clone(), TrackerConfig::default());

    // Roster
    let rosters: [(&str, &str, &[&str]); 4] = [
        ("Crimson Owls", "OWL", &["nova", "drift", "pike"]),
        ("Harbor Kings", "HBK", &["anchor", "gale", "reef"]),
        ("Static Wolves", "STW", &["volt", "hertz", "ohm"]),
        ("Jade Serpents", "JDS", &["fang", "scale", "coil"]),
    ];
    let mut ids = Vec::new();
    for (name, tag, players) in rosters {
        let id = service
            .add_team(
                name,
                Some(tag.to_string()),
                None,
                players.iter().map(|p| p.to_string()).collect(),
            )
            .await?;
        ids.push(id);
    }

    // A display surface mirroring the published key
    let display = DisplaySurface::new(&store, SNAPSHOT_KEY);
    tokio::spawn(display.run());

    // Scripted match: clock runs for a few real seconds while the
    // operator records kills and eliminations.
    service.start().await;
    tokio::time::sleep(std::time::Duration::from_secs(3)).await;

    service.update_kills(ids[0], 0, 2).await?;
    service.update_kills(ids[1], 1, 1).await?;
    service.update_kills(ids[2], 0, 3).await?;

    // Wolves lose two players, then the whole team goes down
    service.set_player_eliminated(ids[2], 1, true).await?;
    service.set_player_eliminated(ids[2], 2, true).await?;
    service.set_team_eliminated(ids[2], true).await?;

    // Operator bumps the Kings above the Owls inside the alive partition
    service.move_team(ids[1], MoveDirection::Up).await?;

    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    service.pause().await;

    // Print the board the way a display surface sees it
    let mirror = DisplaySurface::new(&store, SNAPSHOT_KEY);
    let state = mirror.state();
    info!("=== Scoreboard at {} ===", format_clock(state.match_time));
    for (rank, team) in state.teams.iter().enumerate() {
        let kills: u32 = team.players.iter().map(|p| p.kills).sum();
        let status = if team.eliminated { "OUT" } else { "ALIVE" };
        info!("#{} {} [{}] - {} kills", rank + 1, team.name, status, kills);
        for p in &team.players {
            info!(
                "    {} - {} kills, {} ({})",
                p.name,
                p.kills,
                if p.eliminated { "eliminated" } else { "alive" },
                format_clock(p.survival_time)
            );
        }
    }

    // Reset (auto-confirmed here; a real operator gets the prompt)
    service.reset_match(&|_: &str| true).await;
    info!(
        "After reset the snapshot key is {}",
        if store.get(SNAPSHOT_KEY)?.is_none() {
            "cleared"
        } else {
            "still set"
        }
    );

    info!("=== Demo Complete ===");
    Ok(())
}
