use super::events::Phase;
use crate::core::{PlacementError, ShotError};
use crate::persistence::PersistenceError;

/// Errors returned by [`GameSession`](super::GameSession) commands.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Shot(#[from] ShotError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("expected phase {expected:?}, but the game is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("{remaining} ships still need to be placed")]
    FleetIncomplete { remaining: usize },

    #[error("nickname must not be empty")]
    InvalidNickname,

    #[error("the opponent's turn ended abnormally; restart the game")]
    SessionAborted,
}
