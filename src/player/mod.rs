//! Targeting strategies and the AI opponent.
//!
//! - [`Targeting`]: strategy seam deciding where the next shot goes
//! - [`RandomTargeting`]: uniform random choice among unfired cells
//! - [`AiOpponent`]: fires repeatedly at a board until it misses

use rand::rngs::SmallRng;

use crate::core::{Board, Coordinate, ShotResult};

/// Interface implemented by shot-selection strategies.
///
/// A strategy only sees the target board through its public view. It must
/// never propose a cell that has already been fired upon.
pub trait Targeting: Send {
    /// Choose the next target, or `None` if no unfired cell remains.
    fn select_target(&mut self, rng: &mut SmallRng, board: &Board) -> Option<Coordinate>;

    /// Inform the strategy of the result of its last shot.
    fn observe(&mut self, _coord: Coordinate, _result: ShotResult) {}
}

pub mod ai;
pub mod random;

pub use ai::{AiOpponent, AiState};
pub use random::RandomTargeting;
