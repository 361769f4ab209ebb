use std::sync::{Arc, Mutex};

use broadside::{
    AiOpponent, AiState, Board, Coordinate, Orientation, RandomTargeting, Ship, ShipKind,
    ShotResult, Targeting,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Fires at a fixed list of cells in order.
struct Scripted {
    targets: Vec<Coordinate>,
    observed: Arc<Mutex<Vec<ShotResult>>>,
}

impl Targeting for Scripted {
    fn select_target(&mut self, _rng: &mut SmallRng, _board: &Board) -> Option<Coordinate> {
        if self.targets.is_empty() {
            None
        } else {
            Some(self.targets.remove(0))
        }
    }

    fn observe(&mut self, _coord: Coordinate, result: ShotResult) {
        self.observed.lock().unwrap().push(result);
    }
}

fn carrier_board() -> Board {
    let mut board = Board::new();
    board
        .place_ship(Ship::new(ShipKind::Carrier), Coordinate::new(0, 0), Orientation::Horizontal)
        .unwrap();
    board
}

#[test]
fn test_hit_hit_miss_yields_only_after_the_miss() {
    let observed: Arc<Mutex<Vec<ShotResult>>> = Default::default();
    let mut ai = AiOpponent::new(Box::new(Scripted {
        targets: vec![
            Coordinate::new(0, 0),
            Coordinate::new(0, 1),
            Coordinate::new(5, 5),
            Coordinate::new(0, 2),
        ],
        observed: Arc::clone(&observed),
    }));
    let mut board = carrier_board();
    let mut rng = SmallRng::seed_from_u64(1);

    ai.begin_turn();
    assert_eq!(
        ai.step(&mut rng, &mut board),
        Some((Coordinate::new(0, 0), ShotResult::Hit))
    );
    assert_eq!(ai.state(), AiState::Selecting);
    assert_eq!(
        ai.step(&mut rng, &mut board),
        Some((Coordinate::new(0, 1), ShotResult::Hit))
    );
    assert_eq!(ai.state(), AiState::Selecting);
    assert_eq!(
        ai.step(&mut rng, &mut board),
        Some((Coordinate::new(5, 5), ShotResult::Miss))
    );
    assert_eq!(ai.state(), AiState::Yielding);
    assert_eq!(ai.step(&mut rng, &mut board), None);

    assert_eq!(board.shots_fired().len(), 3);
    assert!(!board.has_been_fired_at(Coordinate::new(0, 2)));
    assert_eq!(
        *observed.lock().unwrap(),
        vec![ShotResult::Hit, ShotResult::Hit, ShotResult::Miss]
    );
}

#[test]
fn test_take_turn_reports_each_shot() {
    let mut ai = AiOpponent::new(Box::new(Scripted {
        targets: vec![Coordinate::new(0, 3), Coordinate::new(9, 0)],
        observed: Default::default(),
    }));
    let mut board = carrier_board();
    let mut rng = SmallRng::seed_from_u64(1);
    let mut shots = Vec::new();
    let fired = ai.take_turn(&mut rng, &mut board, |coord, result| shots.push((coord, result)));
    assert_eq!(fired, 2);
    assert_eq!(
        shots,
        vec![
            (Coordinate::new(0, 3), ShotResult::Hit),
            (Coordinate::new(9, 0), ShotResult::Miss)
        ]
    );
}

#[test]
fn test_turn_ends_when_fleet_is_sunk() {
    let mut board = Board::new();
    board
        .place_ship(Ship::new(ShipKind::Frigate), Coordinate::new(2, 2), Orientation::Horizontal)
        .unwrap();
    let mut ai = AiOpponent::new(Box::new(Scripted {
        targets: vec![Coordinate::new(2, 2), Coordinate::new(3, 3)],
        observed: Default::default(),
    }));
    let mut rng = SmallRng::seed_from_u64(1);
    let fired = ai.take_turn(&mut rng, &mut board, |_, _| {});
    assert_eq!(fired, 1);
    assert!(board.all_ships_sunk());
    assert_eq!(ai.state(), AiState::Yielding);
}

#[test]
fn test_invalid_proposal_ends_turn_without_mutation() {
    let mut board = carrier_board();
    board.receive_shot(Coordinate::new(7, 7)).unwrap();
    let mut ai = AiOpponent::new(Box::new(Scripted {
        targets: vec![Coordinate::new(7, 7)],
        observed: Default::default(),
    }));
    let mut rng = SmallRng::seed_from_u64(1);
    assert_eq!(ai.take_turn(&mut rng, &mut board, |_, _| {}), 0);
    assert_eq!(board.shots_fired().len(), 1);
}

#[test]
fn test_random_targeting_never_repeats() {
    let mut rng = SmallRng::seed_from_u64(99);
    let mut board = Board::new();
    board.place_ships_randomly(&mut rng);
    let mut strategy = RandomTargeting::new();
    for _ in 0..100 {
        let target = strategy.select_target(&mut rng, &board).unwrap();
        assert!(!board.has_been_fired_at(target));
        board.receive_shot(target).unwrap();
    }
    assert!(board.shots_fired().is_full());
    assert_eq!(strategy.select_target(&mut rng, &board), None);
}

#[test]
fn test_random_opponent_sinks_fleet_over_many_turns() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut board = Board::new();
    board.place_ships_randomly(&mut rng);
    let mut ai = AiOpponent::random();
    let mut turns = 0;
    while !board.all_ships_sunk() {
        let fired = ai.take_turn(&mut rng, &mut board, |_, _| {});
        assert!(fired >= 1);
        turns += 1;
        assert!(turns <= 100, "opponent should finish within 100 turns");
    }
    assert!(board.shots_fired().len() >= 20);
}
