//! Control Service
//!
//! Async front for the control surface plus the tick scheduler. A tokio
//! mutex serializes every command, so handlers still run one at a time,
//! to completion — the cooperative model the tracker core assumes.
//!
//! The scheduler arms exactly one outstanding tick while the match runs.
//! Pausing (or resetting) must guarantee that no tick lands afterwards,
//! so cancellation is belt-and-braces: the ticker task is aborted *and*
//! the clock generation is bumped, making any in-flight tick stale before
//! it can touch the surface.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::control::surface::{ControlSurface, ResetGate};
use crate::sync::publisher::SnapshotPublisher;
use crate::sync::store::SnapshotStore;
use crate::tracker::ranking::MoveDirection;
use crate::tracker::state::{TeamId, TrackerError};
use crate::SNAPSHOT_KEY;

/// Tunables for a tracker instance.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Time between clock ticks.
    pub tick_interval: Duration,
    /// Store key snapshots are published under.
    pub snapshot_key: String,
    /// Bounded retry count for failed publishes.
    pub max_publish_retries: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(crate::TICK_SECONDS),
            snapshot_key: SNAPSHOT_KEY.to_string(),
            max_publish_retries: 3,
        }
    }
}

/// Owns the control surface behind a lock and drives its clock.
pub struct ControlService {
    surface: Arc<Mutex<ControlSurface>>,
    config: TrackerConfig,
    /// Bumped on every disarm; a ticker only acts while its generation
    /// is current.
    generation: Arc<AtomicU64>,
    ticker: Option<JoinHandle<()>>,
}

impl ControlService {
    /// Build a service publishing into `store` with the given tunables.
    pub fn new(store: Arc<dyn SnapshotStore>, config: TrackerConfig) -> Self {
        let publisher = SnapshotPublisher::new(store, config.snapshot_key.clone())
            .with_max_retries(config.max_publish_retries);
        Self {
            surface: Arc::new(Mutex::new(ControlSurface::new(publisher))),
            config,
            generation: Arc::new(AtomicU64::new(0)),
            ticker: None,
        }
    }

    /// Shared handle to the surface, for callers that need read access or
    /// multi-command sequences under one lock.
    pub fn surface(&self) -> Arc<Mutex<ControlSurface>> {
        self.surface.clone()
    }

    /// Register a team.
    pub async fn add_team(
        &self,
        name: impl Into<String>,
        tag: Option<String>,
        logo: Option<String>,
        player_names: Vec<String>,
    ) -> Result<TeamId, TrackerError> {
        self.surface.lock().await.add_team(name, tag, logo, player_names)
    }

    /// Move a team one rank within its partition.
    pub async fn move_team(&self, id: TeamId, dir: MoveDirection) -> Result<bool, TrackerError> {
        self.surface.lock().await.move_team(id, dir)
    }

    /// Adjust a player's kill count.
    pub async fn update_kills(
        &self,
        team: TeamId,
        player: usize,
        delta: i32,
    ) -> Result<(), TrackerError> {
        self.surface.lock().await.update_kills(team, player, delta)
    }

    /// Eliminate or revive a single player.
    pub async fn set_player_eliminated(
        &self,
        team: TeamId,
        player: usize,
        value: bool,
    ) -> Result<(), TrackerError> {
        self.surface
            .lock()
            .await
            .set_player_eliminated(team, player, value)
    }

    /// Eliminate or revive a whole team.
    pub async fn set_team_eliminated(&self, team: TeamId, value: bool) -> Result<(), TrackerError> {
        self.surface.lock().await.set_team_eliminated(team, value)
    }

    /// Start the match clock and arm the tick scheduler.
    pub async fn start(&mut self) {
        self.surface.lock().await.start();
        self.arm();
    }

    /// Pause the match clock; no tick fires after this returns.
    pub async fn pause(&mut self) {
        self.surface.lock().await.pause();
        self.disarm();
    }

    /// Confirmation-gated destructive reset; also disarms the scheduler.
    pub async fn reset_match(&mut self, gate: &dyn ResetGate) -> bool {
        let reset = self.surface.lock().await.reset_match(gate);
        if reset {
            self.disarm();
        }
        reset
    }

    /// Spawn the ticker unless one is already armed.
    fn arm(&mut self) {
        if self.ticker.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }
        let armed_gen = self.generation.load(Ordering::SeqCst);
        let generation = self.generation.clone();
        let surface = self.surface.clone();
        let interval = self.config.tick_interval;

        self.ticker = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let mut s = surface.lock().await;
                if generation.load(Ordering::SeqCst) != armed_gen {
                    debug!("stale tick discarded");
                    break;
                }
                if !s.tick() {
                    break;
                }
            }
        }));
    }

    /// Invalidate and abort any armed ticker.
    fn disarm(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for ControlService {
    fn drop(&mut self) {
        self.disarm();
    }
}

// =============================================================================
// TESTS
// =============================================================================
