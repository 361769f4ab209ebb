#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod core;
pub mod player;
pub mod prelude;

#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod persistence;
#[cfg(feature = "std")]
pub mod session;

pub use crate::core::*;
pub use player::{AiOpponent, AiState, RandomTargeting, Targeting};

#[cfg(feature = "std")]
pub use logging::init_logging;
#[cfg(feature = "std")]
pub use persistence::{
    FileSnapshotStore, MemorySnapshotStore, PersistenceError, SavedSnapshot, SnapshotStore,
};
#[cfg(feature = "std")]
pub use session::{
    Boards, EventReceiver, GameError, GameEvent, GameSession, Phase, SessionConfig, Side,
};
