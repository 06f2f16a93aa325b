//! Serializable snapshots of engine state for HTTP/JSON style adapters.

use serde::{Deserialize, Serialize};

use crate::{
    board::Grid,
    common::AttackOutcome,
    game::BattleEngine,
    ship::Ship,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub row: usize,
    pub col: usize,
    pub has_ship: bool,
    pub is_hit: bool,
    pub is_sunk: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<CellView>,
}

impl BoardView {
    /// Build a view of `grid`; `roster` resolves sunk state per cell.
    pub fn new(grid: &Grid, roster: &[Ship]) -> Self {
        let cells = grid
            .cells()
            .map(|(coord, cell)| {
                let ship = cell.ship().and_then(|id| roster.get(id.0));
                CellView {
                    row: coord.row,
                    col: coord.col,
                    has_ship: ship.is_some(),
                    is_hit: cell.is_hit(),
                    is_sunk: ship.is_some_and(Ship::is_sunk),
                }
            })
            .collect();
        BoardView {
            width: grid.width(),
            height: grid.height(),
            cells,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipView {
    pub length: usize,
    pub hits: usize,
    pub is_sunk: bool,
    /// Occupied cells in notation, empty while unplaced.
    pub positions: Vec<String>,
}

impl From<&Ship> for ShipView {
    fn from(ship: &Ship) -> Self {
        ShipView {
            length: ship.length(),
            hits: ship.hits(),
            is_sunk: ship.is_sunk(),
            positions: ship.positions().iter().map(|c| c.to_notation()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub entries: Vec<ScoreEntry>,
}

impl From<&BattleEngine> for ScoreBoard {
    fn from(engine: &BattleEngine) -> Self {
        ScoreBoard {
            entries: engine
                .scores()
                .into_iter()
                .map(|(name, score)| ScoreEntry { name, score })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    pub is_hit: bool,
    pub ship_sunk: bool,
    pub is_game_over: bool,
    pub winner: Option<String>,
    pub message: String,
    pub scores: ScoreBoard,
}

impl AttackReport {
    pub fn new(outcome: &AttackOutcome, engine: &BattleEngine) -> Self {
        let message = if outcome.game_over {
            "Game over"
        } else if outcome.ship_sunk {
            "Sunk"
        } else if outcome.hit {
            "Hit"
        } else {
            "Miss"
        };
        AttackReport {
            is_hit: outcome.hit,
            ship_sunk: outcome.ship_sunk,
            is_game_over: outcome.game_over,
            winner: outcome.winner.as_ref().map(|p| p.name().to_string()),
            message: message.to_string(),
            scores: ScoreBoard::from(engine),
        }
    }
}
