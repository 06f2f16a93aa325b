//! Common types for the battle engine: error taxonomy and attack outcomes.

use alloc::string::String;
use core::fmt;

use crate::coordinate::Coordinate;
use crate::player::{Player, Seat};
use crate::ship::ShipId;

/// Malformed coordinate text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing to parse.
    Empty,
    /// First character is not a letter.
    InvalidColumn(char),
    /// Remainder is not a positive integer.
    InvalidRow(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "Empty coordinate (expected e.g. A1)"),
            ParseError::InvalidColumn(c) => {
                write!(f, "Invalid column '{}' - must be a letter", c)
            }
            ParseError::InvalidRow(r) => {
                write!(f, "Invalid row '{}' - must be a number starting at 1", r)
            }
        }
    }
}

/// Reasons a ship placement is rejected. The grid is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// The match has not been initialized yet.
    NotInitialized,
    /// No ship with this id in the player's roster.
    UnknownShip(ShipId),
    /// The ship already occupies cells on the grid.
    AlreadyPlaced,
    /// Start or end lies outside the grid.
    OutOfBounds,
    /// Diagonal line, or a single point for a ship longer than one.
    InvalidOrientation,
    /// Span between start and end differs from the ship length.
    LengthMismatch { expected: usize, actual: usize },
    /// A cell on the path is already occupied.
    Overlap,
    /// Random placement found no free line for the ship.
    NoRoom,
    /// Start or end could not be parsed.
    Parse(ParseError),
}

impl From<ParseError> for PlacementError {
    fn from(err: ParseError) -> Self {
        PlacementError::Parse(err)
    }
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::NotInitialized => write!(f, "Game has not been initialized"),
            PlacementError::UnknownShip(id) => write!(f, "No ship with id {}", id.0),
            PlacementError::AlreadyPlaced => write!(f, "Ship is already placed on the board"),
            PlacementError::OutOfBounds => write!(f, "Ship is outside the board"),
            PlacementError::InvalidOrientation => {
                write!(f, "Ships must be placed horizontally or vertically")
            }
            PlacementError::LengthMismatch { expected, actual } => {
                write!(f, "Ship length must be {} (got {})", expected, actual)
            }
            PlacementError::Overlap => write!(f, "Ship placement overlaps with another ship"),
            PlacementError::NoRoom => write!(f, "Unable to find room for the ship"),
            PlacementError::Parse(e) => write!(f, "{}", e),
        }
    }
}

/// Reasons an attack is rejected. No state changes and the turn is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackError {
    NotInitialized,
    /// Target lies outside the defender's grid.
    OutOfBounds,
    /// Target cell was already fired upon.
    AlreadyAttacked,
    /// A winner already exists.
    GameAlreadyOver,
    Parse(ParseError),
}

impl From<ParseError> for AttackError {
    fn from(err: ParseError) -> Self {
        AttackError::Parse(err)
    }
}

impl fmt::Display for AttackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackError::NotInitialized => write!(f, "Game has not been initialized"),
            AttackError::OutOfBounds => write!(f, "Target is outside the board"),
            AttackError::AlreadyAttacked => write!(f, "That cell was already attacked"),
            AttackError::GameAlreadyOver => write!(f, "The game is already over"),
            AttackError::Parse(e) => write!(f, "{}", e),
        }
    }
}

/// Rejected match configuration. No engine state is created or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidConfiguration(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidConfiguration(reason) => {
                write!(f, "Invalid configuration: {}", reason)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}
#[cfg(feature = "std")]
impl std::error::Error for PlacementError {}
#[cfg(feature = "std")]
impl std::error::Error for AttackError {}
#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Result of a resolved attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackOutcome {
    pub coordinate: Coordinate,
    pub attacker: Seat,
    pub hit: bool,
    pub ship_sunk: bool,
    pub game_over: bool,
    /// Set only on the shot that ends the game.
    pub winner: Option<Player>,
}
