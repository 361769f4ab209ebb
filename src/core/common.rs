//! Common types for the engine: shot results and board errors.

use crate::core::coordinate::Coordinate;
use crate::core::ship::ShipKind;

/// Result of a valid shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotResult {
    /// Shot landed in open water.
    Miss,
    /// Shot hit a ship that is still afloat.
    Hit,
    /// Shot took the last point of health from a ship.
    Sunk,
}

impl ShotResult {
    /// Hits and sinks grant the shooter another shot.
    pub fn keeps_turn(self) -> bool {
        !matches!(self, ShotResult::Miss)
    }
}

/// Errors returned when a ship cannot be placed. The board is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("ship placement is out of bounds")]
    OutOfBounds,
    #[error("ship placement overlaps with another ship at {0}")]
    Overlaps(Coordinate),
    #[error("ship is already placed on a board")]
    AlreadyPlaced,
    #[error("no {0} remaining to place")]
    NoneRemaining(ShipKind),
}

/// Errors returned for shots that cannot be resolved. The board is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShotError {
    #[error("{0:?} is outside the board")]
    OutOfBounds(Coordinate),
    #[error("{0} was already fired upon")]
    AlreadyFired(Coordinate),
}

/// Inconsistencies found while rebuilding a board from its serialized state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardStateError {
    #[error("{kind} has {cells} cells, expected {expected}")]
    ShipLength {
        kind: ShipKind,
        cells: usize,
        expected: usize,
    },
    #[error("{kind} cells are not contiguous along one axis")]
    ShipShape { kind: ShipKind },
    #[error("{kind} health {health} is inconsistent with its recorded hits")]
    ShipHealth { kind: ShipKind, health: u8 },
    #[error("{0:?} is outside the board")]
    OutOfBounds(Coordinate),
    #[error("ships overlap at {0}")]
    Overlap(Coordinate),
    #[error("sunk count {recorded} does not match {actual} sunk ships")]
    SunkCount { recorded: usize, actual: usize },
    #[error("hit at {0} was never fired upon or misses every ship")]
    StrayHit(Coordinate),
    #[error("hit at {0} is recorded twice")]
    DuplicateHit(Coordinate),
    #[error("{recorded} hits recorded but {actual} shots struck a ship")]
    HitCount { recorded: usize, actual: usize },
}
