//! Grid coordinates and the "A1" notation used on the wire and at the console.
//!
//! Columns are letters (`A` is column 0), rows are 1-based numbers. Parsing is
//! case-insensitive; formatting always emits an uppercase letter.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use crate::common::ParseError;

/// A zero-based (row, column) position on a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse `<letter><number>` notation, e.g. `"A1"` or `"j10"`.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        let mut chars = input.chars();
        let col_ch = chars.next().ok_or(ParseError::Empty)?;
        if !col_ch.is_ascii_alphabetic() {
            return Err(ParseError::InvalidColumn(col_ch));
        }
        let col = (col_ch.to_ascii_uppercase() as u8 - b'A') as usize;

        let row_str = chars.as_str();
        // `usize::from_str` accepts a leading '+', which is not valid notation
        if row_str.is_empty() || !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidRow(row_str.to_string()));
        }
        let row: usize = row_str
            .parse()
            .map_err(|_| ParseError::InvalidRow(row_str.to_string()))?;
        if row == 0 {
            return Err(ParseError::InvalidRow(row_str.to_string()));
        }
        Ok(Coordinate::new(row - 1, col))
    }

    /// Render as notation. Only columns 0..26 have a letter.
    pub fn to_notation(&self) -> String {
        self.to_string()
    }

    /// Whether this coordinate lies on a `width`×`height` grid.
    pub fn in_bounds(&self, width: usize, height: usize) -> bool {
        self.row < height && self.col < width
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row.checked_add(1) {
            Some(row) if self.col < 26 => {
                write!(f, "{}{}", (b'A' + self.col as u8) as char, row)
            }
            _ => write!(f, "({}, {})", self.row, self.col),
        }
    }
}

impl FromStr for Coordinate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Coordinate::parse(s)
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((row, col): (usize, usize)) -> Self {
        Coordinate::new(row, col)
    }
}
