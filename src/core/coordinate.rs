//! Board coordinates and ship orientation.

use core::fmt;
use core::str::FromStr;

use crate::core::config::BOARD_SIZE;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Extends along columns (to the right).
    Horizontal,
    /// Extends along rows (downwards).
    Vertical,
}

impl Orientation {
    /// The other orientation.
    pub fn rotated(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// A `(row, col)` cell address. Values are not clamped to the board; use
/// [`Coordinate::is_on_board`] to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    row: u8,
    col: u8,
}

impl Coordinate {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    /// Returns `true` if the coordinate lies inside the 10×10 grid.
    pub fn is_on_board(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// Cell `n` steps away along `orientation`, or `None` on arithmetic overflow.
    pub fn offset(&self, orientation: Orientation, n: usize) -> Option<Self> {
        let n = u8::try_from(n).ok()?;
        match orientation {
            Orientation::Horizontal => Some(Self::new(self.row, self.col.checked_add(n)?)),
            Orientation::Vertical => Some(Self::new(self.row.checked_add(n)?, self.col)),
        }
    }

    /// Every on-board coordinate in row-major order.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..BOARD_SIZE).flat_map(|r| (0..BOARD_SIZE).map(move |c| Coordinate::new(r, c)))
    }
}

/// `A1` form on the board, `(row,col)` off it.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_on_board() {
            return write!(f, "({},{})", self.row, self.col);
        }
        let col = (b'A' + self.col) as char;
        write!(f, "{}{}", col, self.row + 1)
    }
}

/// Errors produced when parsing a coordinate label such as `B7`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCoordinateError {
    #[error("empty coordinate")]
    Empty,
    #[error("invalid column '{0}' - must be a letter A-J")]
    InvalidColumn(char),
    #[error("invalid row - must be a number 1-10")]
    InvalidRow,
}

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let col_ch = chars
            .next()
            .ok_or(ParseCoordinateError::Empty)?
            .to_ascii_uppercase();
        if !col_ch.is_ascii_uppercase() || (col_ch as u8 - b'A') >= BOARD_SIZE {
            return Err(ParseCoordinateError::InvalidColumn(col_ch));
        }
        let row: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| ParseCoordinateError::InvalidRow)?;
        if row == 0 || row > BOARD_SIZE {
            return Err(ParseCoordinateError::InvalidRow);
        }
        Ok(Coordinate::new(row - 1, col_ch as u8 - b'A'))
    }
}
