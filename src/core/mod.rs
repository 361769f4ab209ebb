//! Core naval combat engine (no_std compatible)
//!
//! This module contains the pure game logic: coordinates, ships, boards and
//! shot resolution. It needs only `alloc` and `rand`, so it can be driven by
//! any shell, synchronous or async.

pub mod bitboard;
pub mod board;
pub mod common;
pub mod config;
pub mod coordinate;
pub mod ship;

// Re-export commonly used types
pub use bitboard::{CellSet, Cells};
pub use board::{Board, BoardState, CellView};
pub use common::{BoardStateError, PlacementError, ShotError, ShotResult};
pub use config::*;
pub use coordinate::{Coordinate, Orientation, ParseCoordinateError};
pub use ship::{Ship, ShipKind};
