//! Shared, lock-guarded access to one match.
//!
//! Mutations hold the write lock for the whole operation, so they are
//! serialized; queries share the read lock and return owned snapshots.
//! Events are drained and handed to the relay while the write lock is
//! still held, so observers see them in resolution order.

use std::sync::Arc;

use rand::Rng;
use tokio::sync::RwLock;

use crate::{
    board::Grid,
    common::{AttackError, AttackOutcome, ConfigError, PlacementError},
    config::MatchConfig,
    coordinate::Coordinate,
    domain::{AttackReport, BoardView, ScoreBoard, ShipView},
    events::BattleEvent,
    game::{BattleEngine, GameStatus},
    notify::RelayHandle,
    player::{Player, Seat},
    ship::ShipId,
};

#[derive(Clone)]
pub struct MatchHandle {
    engine: Arc<RwLock<BattleEngine>>,
    relay: Option<RelayHandle>,
}

impl MatchHandle {
    /// Share `engine` without relaying events; queued events are discarded.
    pub fn new(engine: BattleEngine) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            relay: None,
        }
    }

    /// Share `engine` and forward every event to `relay`.
    pub fn with_relay(engine: BattleEngine, relay: RelayHandle) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            relay: Some(relay),
        }
    }

    fn publish(&self, events: Vec<BattleEvent>) {
        if let Some(relay) = &self.relay {
            for event in events {
                relay.publish(event);
            }
        }
    }

    /// Run `op` under the write lock and publish whatever it raised.
    async fn mutate<R>(&self, op: impl FnOnce(&mut BattleEngine) -> R) -> R {
        let mut engine = self.engine.write().await;
        let result = op(&mut *engine);
        // still locked: relay order must match resolution order
        self.publish(engine.drain_events());
        result
    }

    /// Run `query` under the read lock.
    pub async fn read<R>(&self, query: impl FnOnce(&BattleEngine) -> R) -> R {
        let engine = self.engine.read().await;
        query(&*engine)
    }

    pub async fn initialize_game(&self, config: &MatchConfig) -> Result<(), ConfigError> {
        self.mutate(|e| e.initialize_game(config)).await
    }

    pub async fn place_ship(
        &self,
        seat: Seat,
        id: ShipId,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<(), PlacementError> {
        self.mutate(|e| e.place_ship(seat, id, start, end)).await
    }

    pub async fn place_ship_notation(
        &self,
        seat: Seat,
        id: ShipId,
        start: &str,
        end: &str,
    ) -> Result<(), PlacementError> {
        self.mutate(|e| e.place_ship_notation(seat, id, start, end))
            .await
    }

    pub async fn place_ship_randomly<R: Rng + Send>(
        &self,
        seat: Seat,
        id: ShipId,
        rng: &mut R,
    ) -> Result<(Coordinate, Coordinate), PlacementError> {
        self.mutate(|e| e.place_ship_randomly(seat, id, rng)).await
    }

    pub async fn attack(&self, coord: Coordinate) -> Result<AttackOutcome, AttackError> {
        self.mutate(|e| e.attack(coord)).await
    }

    pub async fn attack_notation(&self, target: &str) -> Result<AttackOutcome, AttackError> {
        self.mutate(|e| e.attack_notation(target)).await
    }

    /// Attack and build the response under the same lock, so the scores in the
    /// report belong to this shot.
    pub async fn attack_report(&self, target: &str) -> Result<AttackReport, AttackError> {
        self.mutate(|e| -> Result<AttackReport, AttackError> {
            let outcome = e.attack_notation(target)?;
            Ok(AttackReport::new(&outcome, e))
        })
        .await
    }

    pub async fn status(&self) -> GameStatus {
        self.read(BattleEngine::status).await
    }

    pub async fn current_player(&self) -> Option<Player> {
        self.read(|e| e.current_player().cloned()).await
    }

    pub async fn next_player(&self) -> Option<Player> {
        self.read(|e| e.next_player().cloned()).await
    }

    pub async fn players(&self) -> Vec<Player> {
        self.read(|e| e.players().into_iter().cloned().collect())
            .await
    }

    pub async fn seat_of(&self, name: &str) -> Option<Seat> {
        self.read(|e| e.seat_of(name)).await
    }

    pub async fn score(&self, seat: Seat) -> u32 {
        self.read(|e| e.score(seat)).await
    }

    pub async fn scores(&self) -> ScoreBoard {
        self.read(|e| ScoreBoard::from(e)).await
    }

    pub async fn grid(&self, seat: Seat) -> Option<Grid> {
        self.read(|e| e.grid(seat).cloned()).await
    }

    pub async fn board_view(&self, seat: Seat) -> Option<BoardView> {
        self.read(|e| e.grid(seat).map(|g| BoardView::new(g, e.roster(seat))))
            .await
    }

    pub async fn roster(&self, seat: Seat) -> Vec<ShipView> {
        self.read(|e| e.roster(seat).iter().map(ShipView::from).collect())
            .await
    }

    pub async fn all_ships_sunk(&self, seat: Seat) -> bool {
        self.read(|e| e.all_ships_sunk(seat)).await
    }

    pub async fn fleet_deployed(&self, seat: Seat) -> bool {
        self.read(|e| e.fleet_deployed(seat)).await
    }

    pub async fn unplaced_ship_of_length(&self, seat: Seat, length: usize) -> Option<ShipId> {
        self.read(|e| e.unplaced_ship_of_length(seat, length))
            .await
    }
}
