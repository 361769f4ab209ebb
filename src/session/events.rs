//! Notifications published by a running session.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::core::{Coordinate, Ship, ShotResult};

/// A participant in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Human,
    Ai,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Human => Side::Ai,
            Side::Ai => Side::Human,
        }
    }
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The human is placing their fleet.
    Placing,
    /// Shots are being exchanged.
    Battle,
    /// One fleet has been sunk. Only restart or close remain.
    GameOver,
}

/// Something observable happened in the session.
///
/// `board` fields name the side that owns the board the shot landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    ShotResolved {
        coordinate: Coordinate,
        result: ShotResult,
        board: Side,
    },
    ShipSunk {
        board: Side,
        ship: Ship,
    },
    TurnChanged(Side),
    /// Elapsed battle seconds after a timer tick.
    TimerTick(u64),
    GameOver {
        player_won: bool,
    },
    PhaseChanged(Phase),
    AutosaveFailed {
        reason: String,
    },
}

pub type EventSender = mpsc::UnboundedSender<GameEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<GameEvent>;

/// Publish `event`. Nobody listening is not an error.
pub(crate) fn emit(events: &EventSender, event: GameEvent) {
    if events.send(event).is_err() {
        log::trace!("Event dropped: receiver closed");
    }
}
