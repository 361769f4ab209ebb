//! Commonly used types and utilities for ease of import.

pub use crate::core::{
    Board, Coordinate, Orientation, PlacementError, Ship, ShipKind, ShotError, ShotResult,
};
pub use crate::player::{AiOpponent, RandomTargeting, Targeting};

#[cfg(feature = "std")]
pub use crate::persistence::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
#[cfg(feature = "std")]
pub use crate::session::{GameError, GameEvent, GameSession, Phase, SessionConfig, Side};
