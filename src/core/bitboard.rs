//! A 10×10 set of coordinates packed into a single `u128`.
//!
//! Used for shot tracking, where membership tests happen on every shot and
//! the set only ever grows. The type is `Copy` and allocation free.

use core::fmt;

use crate::core::config::BOARD_SIZE;
use crate::core::coordinate::Coordinate;

const N: usize = BOARD_SIZE as usize;
const BOARD_BITS: usize = N * N;

/// Set of on-board coordinates. Off-board coordinates are never members.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellSet {
    bits: u128,
}

impl CellSet {
    #[inline]
    fn mask() -> u128 {
        (1u128 << BOARD_BITS) - 1
    }

    #[inline]
    fn index(coord: Coordinate) -> Option<usize> {
        if coord.is_on_board() {
            Some(coord.row() as usize * N + coord.col() as usize)
        } else {
            None
        }
    }

    /// Create an empty set.
    #[inline]
    pub const fn new() -> Self {
        CellSet { bits: 0 }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns `true` when every board cell is a member.
    pub fn is_full(&self) -> bool {
        self.bits == Self::mask()
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        match Self::index(coord) {
            Some(idx) => (self.bits >> idx) & 1 == 1,
            None => false,
        }
    }

    /// Adds `coord`. Returns `false` if it was already present or lies off the board.
    pub fn insert(&mut self, coord: Coordinate) -> bool {
        match Self::index(coord) {
            Some(idx) => {
                let bit = 1u128 << idx;
                let fresh = self.bits & bit == 0;
                self.bits |= bit;
                fresh
            }
            None => false,
        }
    }

    /// Raw bit representation, row-major from the least significant bit.
    #[inline]
    pub fn into_raw(self) -> u128 {
        self.bits
    }

    /// Creates a set from raw bits, masking out anything beyond the board.
    #[inline]
    pub fn from_raw(raw: u128) -> Self {
        CellSet {
            bits: raw & Self::mask(),
        }
    }

    /// Iterator over members in row-major order.
    #[inline]
    pub fn iter(&self) -> Cells {
        Cells {
            bits: self.bits,
            idx: 0,
        }
    }
}

impl FromIterator<Coordinate> for CellSet {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        let mut set = CellSet::new();
        for coord in iter {
            set.insert(coord);
        }
        set
    }
}

impl fmt::Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CellSet ({} cells):", self.len())?;
        for r in 0..N {
            for c in 0..N {
                let bit = if (self.bits >> (r * N + c)) & 1 == 1 {
                    '■'
                } else {
                    '□'
                };
                write!(f, "{} ", bit)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Iterator over the members of a [`CellSet`].
#[derive(Clone, Copy)]
pub struct Cells {
    bits: u128,
    idx: usize,
}

impl Iterator for Cells {
    type Item = Coordinate;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.idx < BOARD_BITS {
            let idx = self.idx;
            self.idx += 1;
            if (self.bits >> idx) & 1 == 1 {
                return Some(Coordinate::new((idx / N) as u8, (idx % N) as u8));
            }
        }
        None
    }
}
