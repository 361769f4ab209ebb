//! Ship kinds and per-ship damage tracking.

use alloc::vec::Vec;
use core::fmt;

use crate::core::coordinate::{Coordinate, Orientation};

/// Kind of ship, which fixes its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShipKind {
    Carrier,
    Submarine,
    Destroyer,
    Frigate,
}

impl ShipKind {
    /// Number of cells occupied by this kind.
    pub const fn size(self) -> usize {
        match self {
            ShipKind::Carrier => 4,
            ShipKind::Submarine => 3,
            ShipKind::Destroyer => 2,
            ShipKind::Frigate => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShipKind::Carrier => "Carrier",
            ShipKind::Submarine => "Submarine",
            ShipKind::Destroyer => "Destroyer",
            ShipKind::Frigate => "Frigate",
        }
    }
}

impl fmt::Display for ShipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A ship with its occupied cells and remaining health.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    kind: ShipKind,
    positions: Vec<Coordinate>,
    health: u8,
}

impl Ship {
    /// An unplaced ship at full health.
    pub fn new(kind: ShipKind) -> Self {
        Self {
            kind,
            positions: Vec::with_capacity(kind.size()),
            health: kind.size() as u8,
        }
    }

    /// Append an occupied cell. Bounds are the board's responsibility.
    pub fn add_occupied_cell(&mut self, coord: Coordinate) {
        self.positions.push(coord);
    }

    /// Take one point of damage. Sunk ships stay at zero.
    pub fn register_hit(&mut self) {
        self.health = self.health.saturating_sub(1);
    }

    pub fn is_sunk(&self) -> bool {
        self.health == 0
    }

    pub fn kind(&self) -> ShipKind {
        self.kind
    }

    pub fn health(&self) -> u8 {
        self.health
    }

    /// Occupied cells in placement order.
    pub fn positions(&self) -> &[Coordinate] {
        &self.positions
    }

    pub fn occupies(&self, coord: Coordinate) -> bool {
        self.positions.contains(&coord)
    }

    /// First occupied cell, if placed.
    pub fn origin(&self) -> Option<Coordinate> {
        self.positions.first().copied()
    }

    /// Axis the ship lies along. Single-cell ships report `Horizontal`.
    pub fn orientation(&self) -> Orientation {
        match self.positions.as_slice() {
            [first, second, ..] if first.col() == second.col() => Orientation::Vertical,
            _ => Orientation::Horizontal,
        }
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ kind: {}, origin: {:?}, orientation: {:?}, health: {}/{} }}",
            self.kind,
            self.origin(),
            self.orientation(),
            self.health,
            self.kind.size(),
        )
    }
}
