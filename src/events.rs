//! Outcome notifications raised by the engine during attack resolution.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::coordinate::Coordinate;

/// What a shot did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    Miss,
    Hit,
    Sunk,
    GameOver,
}

/// Minimal, stable payload describing one resolved shot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleEvent {
    pub kind: EventKind,
    pub attacker: String,
    pub defender: String,
    pub coordinate: Coordinate,
    pub attacker_score: u32,
    pub defender_score: u32,
}

impl BattleEvent {
    /// Plain text for consoles and push relays.
    pub fn message(&self) -> String {
        alloc::format!("{}", self)
    }
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EventKind::Miss => write!(
                f,
                "{} fired at {}: miss.",
                self.attacker, self.coordinate
            ),
            EventKind::Hit => write!(
                f,
                "{} fired at {}: hit on {}'s ship!",
                self.attacker, self.coordinate, self.defender
            ),
            EventKind::Sunk => write!(
                f,
                "{} fired at {}: {}'s ship was sunk!",
                self.attacker, self.coordinate, self.defender
            ),
            EventKind::GameOver => write!(
                f,
                "Game over at {}. Winner: {} ({}). Loser: {} ({}).",
                self.coordinate,
                self.attacker,
                self.attacker_score,
                self.defender,
                self.defender_score
            ),
        }
    }
}

/// Callback invoked synchronously for every event.
pub type Listener = Box<dyn FnMut(&BattleEvent) + Send + Sync>;
