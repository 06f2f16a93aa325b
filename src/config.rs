use alloc::string::String;
use alloc::vec::Vec;

use crate::common::ConfigError;

pub const DEFAULT_WIDTH: usize = 8;
pub const DEFAULT_HEIGHT: usize = 8;
pub const DEFAULT_FLEET: [usize; 3] = [5, 4, 3];

/// Column notation uses a single letter.
pub const MAX_COLUMNS: usize = 26;

/// Largest accepted board height.
pub const MAX_ROWS: usize = 100;

/// Everything needed to (re)start a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    pub player_names: [String; 2],
    pub width: usize,
    pub height: usize,
    /// Ship lengths per seat, in roster order.
    pub fleets: [Vec<usize>; 2],
}

impl MatchConfig {
    pub fn new(
        player1: impl Into<String>,
        player2: impl Into<String>,
        width: usize,
        height: usize,
        fleet1: Vec<usize>,
        fleet2: Vec<usize>,
    ) -> Self {
        Self {
            player_names: [player1.into(), player2.into()],
            width,
            height,
            fleets: [fleet1, fleet2],
        }
    }

    /// Default 8×8 board with the 5/4/3 fleet for both sides.
    pub fn standard(player1: impl Into<String>, player2: impl Into<String>) -> Self {
        Self::new(
            player1,
            player2,
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            DEFAULT_FLEET.to_vec(),
            DEFAULT_FLEET.to_vec(),
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "board width and height must be positive",
            ));
        }
        if self.width > MAX_COLUMNS {
            return Err(ConfigError::InvalidConfiguration(
                "board width cannot exceed 26 columns",
            ));
        }
        if self.height > MAX_ROWS {
            return Err(ConfigError::InvalidConfiguration(
                "board height cannot exceed 100 rows",
            ));
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(ConfigError::InvalidConfiguration("board is too large"));
        }
        if self.player_names.iter().any(|n| n.trim().is_empty()) {
            return Err(ConfigError::InvalidConfiguration(
                "player names must not be empty",
            ));
        }
        if self.fleets.iter().any(|f| f.is_empty()) {
            return Err(ConfigError::InvalidConfiguration(
                "each player needs at least one ship",
            ));
        }
        if self.fleets.iter().flatten().any(|&len| len == 0) {
            return Err(ConfigError::InvalidConfiguration(
                "ship lengths must be positive",
            ));
        }
        Ok(())
    }
}

/// Parse a comma separated list of ship lengths, e.g. `"5,4,3"`.
pub fn parse_fleet(input: &str) -> Result<Vec<usize>, ConfigError> {
    let fleet = input
        .split(',')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| ConfigError::InvalidConfiguration("ship lengths must be numbers"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if fleet.is_empty() {
        return Err(ConfigError::InvalidConfiguration(
            "each player needs at least one ship",
        ));
    }
    Ok(fleet)
}
