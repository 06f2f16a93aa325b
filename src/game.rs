//! The battle engine: two players, their grids and rosters, and turn order.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use rand::Rng;

use crate::{
    board::Grid,
    common::{AttackError, AttackOutcome, ConfigError, PlacementError},
    config::MatchConfig,
    coordinate::Coordinate,
    events::{BattleEvent, EventKind, Listener},
    player::{Player, Seat},
    ship::{Ship, ShipId},
};

/// Current phase of the turn state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    /// `initialize_game` has not succeeded yet.
    NotStarted,
    /// The given seat fires next.
    Turn(Seat),
    GameOver { winner: Seat },
}

/// Everything one player owns for the duration of a match.
struct Side {
    player: Player,
    grid: Grid,
    roster: Vec<Ship>,
}

impl Side {
    fn new(name: &str, width: usize, height: usize, fleet: &[usize]) -> Self {
        Self {
            player: Player::new(name),
            grid: Grid::new(width, height),
            roster: fleet.iter().map(|&len| Ship::new(len)).collect(),
        }
    }

    fn all_sunk(&self) -> bool {
        !self.roster.is_empty() && self.roster.iter().all(Ship::is_sunk)
    }
}

/// One match between two players.
///
/// All mutation goes through `&mut self`; wrap the engine in a lock (see
/// `session::MatchHandle`) to share it. Events raised by `attack` are passed
/// to every subscriber before `attack` returns and are also queued for
/// `drain_events`.
pub struct BattleEngine {
    sides: Option<[Side; 2]>,
    current: Seat,
    winner: Option<Seat>,
    pending: VecDeque<BattleEvent>,
    listeners: Vec<Listener>,
}

impl Default for BattleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleEngine {
    /// Create an engine with no match loaded. Queries return empty results
    /// until `initialize_game` succeeds.
    pub fn new() -> Self {
        Self {
            sides: None,
            current: Seat::First,
            winner: None,
            pending: VecDeque::new(),
            listeners: Vec::new(),
        }
    }

    /// Create an engine and initialize it in one step.
    pub fn with_config(config: &MatchConfig) -> Result<Self, ConfigError> {
        let mut engine = Self::new();
        engine.initialize_game(config)?;
        Ok(engine)
    }

    /// (Re)build all match state. On error the previous state is kept.
    /// Subscribers survive re-initialization; queued events do not.
    pub fn initialize_game(&mut self, config: &MatchConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let [name1, name2] = &config.player_names;
        self.sides = Some([
            Side::new(name1, config.width, config.height, &config.fleets[0]),
            Side::new(name2, config.width, config.height, &config.fleets[1]),
        ]);
        self.current = Seat::First;
        self.winner = None;
        self.pending.clear();
        log::info!(
            "new match: {} vs {} on {}x{} board",
            name1,
            name2,
            config.width,
            config.height
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.sides.is_some()
    }

    /// Register a callback run synchronously for every event.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&BattleEvent) + Send + Sync + 'static,
    {
        self.listeners.push(alloc::boxed::Box::new(listener));
    }

    /// Take all events raised since the last call.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        self.pending.drain(..).collect()
    }

    /// Place roster ship `id` of `seat` between `start` and `end` (inclusive).
    pub fn place_ship(
        &mut self,
        seat: Seat,
        id: ShipId,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<(), PlacementError> {
        let sides = self.sides.as_mut().ok_or(PlacementError::NotInitialized)?;
        let Side { grid, roster, player } = &mut sides[seat.index()];
        let ship = roster.get_mut(id.0).ok_or(PlacementError::UnknownShip(id))?;
        if ship.is_placed() {
            return Err(PlacementError::AlreadyPlaced);
        }
        let path = match grid.validate_placement(ship.length(), start, end) {
            Ok(path) => path,
            Err(e) => {
                log::debug!(
                    "{} could not place ship {} at {}-{}: {}",
                    player.name(),
                    id.0,
                    start,
                    end,
                    e
                );
                return Err(e);
            }
        };
        grid.occupy(id, &path);
        ship.set_positions(path);
        log::debug!(
            "{} placed ship {} (length {}) at {}-{}",
            player.name(),
            id.0,
            ship.length(),
            start,
            end
        );
        Ok(())
    }

    /// Place roster ship `id` of `seat` on a random free line.
    pub fn place_ship_randomly<R: Rng>(
        &mut self,
        seat: Seat,
        id: ShipId,
        rng: &mut R,
    ) -> Result<(Coordinate, Coordinate), PlacementError> {
        let side = self
            .side(seat)
            .ok_or(PlacementError::NotInitialized)?;
        let ship = side.roster.get(id.0).ok_or(PlacementError::UnknownShip(id))?;
        if ship.is_placed() {
            return Err(PlacementError::AlreadyPlaced);
        }
        let (start, end) = side
            .grid
            .random_placement(rng, ship.length())
            .ok_or(PlacementError::NoRoom)?;
        self.place_ship(seat, id, start, end)?;
        Ok((start, end))
    }

    /// Like [`place_ship`](Self::place_ship) with "A1"-style coordinates.
    pub fn place_ship_notation(
        &mut self,
        seat: Seat,
        id: ShipId,
        start: &str,
        end: &str,
    ) -> Result<(), PlacementError> {
        let start = Coordinate::parse(start)?;
        let end = Coordinate::parse(end)?;
        self.place_ship(seat, id, start, end)
    }

    /// Fire the current player's shot at `coord` on the opponent's grid.
    ///
    /// A miss passes the turn; a hit keeps it. Rejected shots change nothing.
    pub fn attack(&mut self, coord: Coordinate) -> Result<AttackOutcome, AttackError> {
        let sides = self.sides.as_mut().ok_or(AttackError::NotInitialized)?;
        if self.winner.is_some() {
            return Err(AttackError::GameAlreadyOver);
        }
        let attacker = self.current;
        let defender = attacker.other();

        let struck = {
            let side = &mut sides[defender.index()];
            side.grid.receive_attack(coord)?
        };
        let (hit, ship_sunk) = match struck {
            Some(id) => {
                let sunk = sides[defender.index()]
                    .roster
                    .get_mut(id.0)
                    .map_or(false, Ship::register_hit);
                sides[attacker.index()].player.add_point();
                (true, sunk)
            }
            None => (false, false),
        };

        let game_over = sides[defender.index()].all_sunk();
        if game_over {
            self.winner = Some(attacker);
        } else if !hit {
            self.current = defender;
        }

        let kind = if game_over {
            EventKind::GameOver
        } else if ship_sunk {
            EventKind::Sunk
        } else if hit {
            EventKind::Hit
        } else {
            EventKind::Miss
        };
        let attacking = &sides[attacker.index()].player;
        let defending = &sides[defender.index()].player;
        let event = BattleEvent {
            kind,
            attacker: String::from(attacking.name()),
            defender: String::from(defending.name()),
            coordinate: coord,
            attacker_score: attacking.score(),
            defender_score: defending.score(),
        };
        let winner = if game_over {
            log::info!("{} sank the last ship of {}", attacking.name(), defending.name());
            Some(attacking.clone())
        } else {
            log::debug!("{} -> {:?} at {}", attacking.name(), kind, coord);
            None
        };

        self.emit(event);
        Ok(AttackOutcome {
            coordinate: coord,
            attacker,
            hit,
            ship_sunk,
            game_over,
            winner,
        })
    }

    /// Like [`attack`](Self::attack) with an "A1"-style coordinate.
    pub fn attack_notation(&mut self, target: &str) -> Result<AttackOutcome, AttackError> {
        let coord = Coordinate::parse(target)?;
        self.attack(coord)
    }

    fn emit(&mut self, event: BattleEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
        self.pending.push_back(event);
    }

    /// True iff every ship in the seat's roster is sunk. False before
    /// initialization.
    pub fn all_ships_sunk(&self, seat: Seat) -> bool {
        self.side(seat).map_or(false, Side::all_sunk)
    }

    pub fn status(&self) -> GameStatus {
        match (&self.sides, self.winner) {
            (None, _) => GameStatus::NotStarted,
            (Some(_), Some(winner)) => GameStatus::GameOver { winner },
            (Some(_), None) => GameStatus::Turn(self.current),
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    fn side(&self, seat: Seat) -> Option<&Side> {
        self.sides.as_ref().map(|sides| &sides[seat.index()])
    }

    /// Seat whose turn it is, once initialized.
    pub fn current_seat(&self) -> Option<Seat> {
        self.sides.as_ref().map(|_| self.current)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.player(self.current)
    }

    /// The player being fired upon this turn.
    pub fn next_player(&self) -> Option<&Player> {
        self.player(self.current.other())
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.and_then(|seat| self.player(seat))
    }

    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.side(seat).map(|s| &s.player)
    }

    pub fn players(&self) -> Vec<&Player> {
        match &self.sides {
            Some(sides) => sides.iter().map(|s| &s.player).collect(),
            None => Vec::new(),
        }
    }

    /// Seat of the player called `name`.
    pub fn seat_of(&self, name: &str) -> Option<Seat> {
        Seat::BOTH
            .into_iter()
            .find(|&seat| self.player(seat).is_some_and(|p| p.name() == name))
    }

    pub fn score(&self, seat: Seat) -> u32 {
        self.player(seat).map_or(0, Player::score)
    }

    /// Name and score of each player, in seat order.
    pub fn scores(&self) -> Vec<(String, u32)> {
        self.players()
            .into_iter()
            .map(|p| (String::from(p.name()), p.score()))
            .collect()
    }

    pub fn grid(&self, seat: Seat) -> Option<&Grid> {
        self.side(seat).map(|s| &s.grid)
    }

    /// The seat's ships in roster order; empty before initialization.
    pub fn roster(&self, seat: Seat) -> &[Ship] {
        self.side(seat).map(|s| s.roster.as_slice()).unwrap_or(&[])
    }

    pub fn ship(&self, seat: Seat, id: ShipId) -> Option<&Ship> {
        self.roster(seat).get(id.0)
    }

    /// First ship of `length` the seat has not placed yet.
    pub fn unplaced_ship_of_length(&self, seat: Seat, length: usize) -> Option<ShipId> {
        self.roster(seat)
            .iter()
            .position(|s| s.length() == length && !s.is_placed())
            .map(ShipId)
    }

    /// Whether every ship of the seat has been placed.
    pub fn fleet_deployed(&self, seat: Seat) -> bool {
        let roster = self.roster(seat);
        !roster.is_empty() && roster.iter().all(Ship::is_placed)
    }
}
