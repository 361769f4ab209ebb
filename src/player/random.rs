use rand::rngs::SmallRng;
use rand::Rng;

use super::Targeting;
use crate::core::{Board, Coordinate, BOARD_SIZE};

/// Picks uniformly random cells, rejecting any that were already fired upon.
///
/// Hit history is deliberately ignored: there is no follow-up "hunt" after a hit.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTargeting;

impl RandomTargeting {
    pub fn new() -> Self {
        Self
    }
}

impl Targeting for RandomTargeting {
    fn select_target(&mut self, rng: &mut SmallRng, board: &Board) -> Option<Coordinate> {
        if board.shots_fired().is_full() {
            return None;
        }
        loop {
            let target = Coordinate::new(
                rng.random_range(0..BOARD_SIZE),
                rng.random_range(0..BOARD_SIZE),
            );
            if !board.has_been_fired_at(target) {
                return Some(target);
            }
        }
    }
}
