use alloc::boxed::Box;
use core::fmt;

use rand::rngs::SmallRng;

use super::{RandomTargeting, Targeting};
use crate::core::{Board, Coordinate, ShotResult};

/// Where the opponent is within its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiState {
    /// Choosing the next target.
    Selecting,
    /// A target has been chosen and the shot is being resolved.
    Firing(Coordinate),
    /// The turn is over; control returns to the other side.
    Yielding,
}

/// Computer opponent that keeps firing until it misses.
///
/// Nothing carries over between turns except what the strategy itself keeps.
pub struct AiOpponent {
    strategy: Box<dyn Targeting>,
    state: AiState,
}

impl AiOpponent {
    pub fn new(strategy: Box<dyn Targeting>) -> Self {
        Self {
            strategy,
            state: AiState::Yielding,
        }
    }

    /// Opponent using [`RandomTargeting`].
    pub fn random() -> Self {
        Self::new(Box::new(RandomTargeting::new()))
    }

    pub fn state(&self) -> AiState {
        self.state
    }

    /// Start a fresh turn.
    pub fn begin_turn(&mut self) {
        self.state = AiState::Selecting;
    }

    /// Fire a single shot at `board`.
    ///
    /// Returns `None` once the turn is over. After a miss, or once every ship
    /// on `board` is sunk, the opponent moves to [`AiState::Yielding`]. A
    /// strategy that runs out of targets or proposes an invalid cell also
    /// ends the turn without touching the board.
    pub fn step(&mut self, rng: &mut SmallRng, board: &mut Board) -> Option<(Coordinate, ShotResult)> {
        if self.state == AiState::Yielding {
            return None;
        }

        let Some(target) = self.strategy.select_target(rng, board) else {
            self.state = AiState::Yielding;
            return None;
        };
        self.state = AiState::Firing(target);

        match board.receive_shot(target) {
            Ok(result) => {
                self.strategy.observe(target, result);
                self.state = if result.keeps_turn() && !board.all_ships_sunk() {
                    AiState::Selecting
                } else {
                    AiState::Yielding
                };
                Some((target, result))
            }
            Err(_) => {
                self.state = AiState::Yielding;
                None
            }
        }
    }

    /// Play a whole turn without pauses, reporting each shot to `on_shot`.
    /// Returns the number of shots fired.
    pub fn take_turn<F>(&mut self, rng: &mut SmallRng, board: &mut Board, mut on_shot: F) -> usize
    where
        F: FnMut(Coordinate, ShotResult),
    {
        self.begin_turn();
        let mut shots = 0;
        while let Some((coord, result)) = self.step(rng, board) {
            on_shot(coord, result);
            shots += 1;
        }
        shots
    }
}

impl Default for AiOpponent {
    fn default() -> Self {
        Self::random()
    }
}

impl fmt::Debug for AiOpponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiOpponent")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
