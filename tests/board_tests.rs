use broadside::{
    standard_fleet, Board, BoardState, BoardStateError, CellView, Coordinate, FleetTracker,
    Orientation, PlacementError, Ship, ShipKind, ShotError, ShotResult, FLEET_SIZE,
    TOTAL_SHIP_CELLS,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn c(row: u8, col: u8) -> Coordinate {
    Coordinate::new(row, col)
}

#[test]
fn test_valid_placement_fills_occupancy() {
    let mut board = Board::new();
    let index = board
        .place_ship(Ship::new(ShipKind::Carrier), c(3, 2), Orientation::Vertical)
        .unwrap();
    let ship = &board.fleet()[index];
    assert_eq!(ship.positions().len(), ShipKind::Carrier.size());
    for &pos in ship.positions() {
        assert_eq!(board.ship_index_at(pos), Some(index));
    }
    assert_eq!(ship.positions()[3], c(6, 2));
}

#[test]
fn test_placement_past_edge_fails_and_leaves_fleet_empty() {
    let mut board = Board::new();
    let err = board
        .place_ship(Ship::new(ShipKind::Carrier), c(0, 8), Orientation::Horizontal)
        .unwrap_err();
    assert_eq!(err, PlacementError::OutOfBounds);
    assert!(board.fleet().is_empty());
    assert_eq!(board.ship_at(c(0, 8)), None);
    assert_eq!(board.ship_at(c(0, 9)), None);
}

#[test]
fn test_overlapping_placement_keeps_only_first_ship() {
    let mut board = Board::new();
    board
        .place_ship(Ship::new(ShipKind::Submarine), c(4, 4), Orientation::Horizontal)
        .unwrap();
    let err = board
        .place_ship(Ship::new(ShipKind::Carrier), c(2, 5), Orientation::Vertical)
        .unwrap_err();
    assert_eq!(err, PlacementError::Overlaps(c(4, 5)));
    assert_eq!(board.fleet().len(), 1);
    assert_eq!(board.ship_at(c(2, 5)), None);
    assert_eq!(board.ship_at(c(3, 5)), None);
}

#[test]
fn test_placing_a_placed_ship_is_rejected() {
    let mut board = Board::new();
    let mut ship = Ship::new(ShipKind::Frigate);
    ship.add_occupied_cell(c(0, 0));
    assert_eq!(
        board.place_ship(ship, c(5, 5), Orientation::Horizontal),
        Err(PlacementError::AlreadyPlaced)
    );
}

#[test]
fn test_repeated_shot_is_invalid_and_counted_once() {
    let mut board = Board::new();
    board
        .place_ship(Ship::new(ShipKind::Destroyer), c(0, 0), Orientation::Horizontal)
        .unwrap();
    for target in [c(0, 0), c(7, 7)] {
        let before = board.shots_fired().len();
        assert!(board.receive_shot(target).is_ok());
        assert_eq!(
            board.receive_shot(target),
            Err(ShotError::AlreadyFired(target))
        );
        assert_eq!(board.shots_fired().len(), before + 1);
    }
    assert_eq!(board.fleet()[0].health(), 1);
    assert_eq!(board.hit_history(), &[c(0, 0)]);
}

#[test]
fn test_shot_at_water_is_a_miss() {
    let mut board = Board::new();
    assert_eq!(board.receive_shot(c(5, 5)), Ok(ShotResult::Miss));
    assert!(board.has_been_fired_at(c(5, 5)));
    assert!(board.hit_history().is_empty());
    assert_eq!(board.cell(c(5, 5)), CellView::Miss);
}

#[test]
fn test_off_board_shot_is_invalid() {
    let mut board = Board::new();
    assert_eq!(
        board.receive_shot(c(10, 0)),
        Err(ShotError::OutOfBounds(c(10, 0)))
    );
    assert!(board.shots_fired().is_empty());
}

#[test]
fn test_sinking_the_only_ship_sinks_the_fleet() {
    let mut board = Board::new();
    board
        .place_ship(Ship::new(ShipKind::Frigate), c(9, 9), Orientation::Horizontal)
        .unwrap();
    assert!(!board.all_ships_sunk());
    assert_eq!(board.receive_shot(c(9, 9)), Ok(ShotResult::Sunk));
    assert!(board.fleet()[0].is_sunk());
    assert_eq!(board.sunk_count(), 1);
    assert!(board.all_ships_sunk());
    assert_eq!(board.cell(c(9, 9)), CellView::Sunk);
}

#[test]
fn test_hits_before_sink() {
    let mut board = Board::new();
    board
        .place_ship(Ship::new(ShipKind::Submarine), c(1, 1), Orientation::Vertical)
        .unwrap();
    board
        .place_ship(Ship::new(ShipKind::Frigate), c(8, 8), Orientation::Vertical)
        .unwrap();
    assert_eq!(board.receive_shot(c(1, 1)), Ok(ShotResult::Hit));
    assert_eq!(board.cell(c(1, 1)), CellView::Hit);
    assert_eq!(board.cell(c(2, 1)), CellView::Ship);
    assert_eq!(board.receive_shot(c(2, 1)), Ok(ShotResult::Hit));
    assert_eq!(board.receive_shot(c(3, 1)), Ok(ShotResult::Sunk));
    assert_eq!(board.ships_afloat(), 1);
    assert!(!board.all_ships_sunk());
}

#[test]
fn test_empty_board_is_not_all_sunk() {
    assert!(!Board::new().all_ships_sunk());
}

#[test]
fn test_random_fleet_has_ten_ships_and_twenty_cells() {
    for seed in 0..50 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = Board::new();
        board.place_ships_randomly(&mut rng);
        assert_eq!(board.fleet().len(), FLEET_SIZE);
        let cells: usize = board.fleet().iter().map(|s| s.positions().len()).sum();
        assert_eq!(cells, TOTAL_SHIP_CELLS);
        for ship in board.fleet() {
            assert_eq!(ship.positions().len(), ship.kind().size());
            assert!(ship.positions().iter().all(Coordinate::is_on_board));
        }
        let kinds: Vec<ShipKind> = board.fleet().iter().map(Ship::kind).collect();
        assert_eq!(kinds, standard_fleet().collect::<Vec<_>>());
        assert!(FleetTracker::for_board(&board).is_complete());
    }
}

#[test]
fn test_fleet_tracker_counts_down() {
    let mut tracker = FleetTracker::new();
    assert_eq!(tracker.total_remaining(), FLEET_SIZE);
    assert_eq!(tracker.remaining(ShipKind::Frigate), 4);
    assert!(tracker.record(ShipKind::Carrier));
    assert!(!tracker.record(ShipKind::Carrier));
    assert_eq!(tracker.pending().next(), Some(ShipKind::Submarine));
}

#[test]
fn test_board_state_round_trip() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut board = Board::new();
    board.place_ships_randomly(&mut rng);
    for target in Coordinate::all().step_by(3) {
        board.receive_shot(target).unwrap();
    }
    let state = BoardState::from(&board);
    let restored = Board::try_from(state).unwrap();
    assert_eq!(restored, board);
}

#[test]
fn test_board_state_rejects_overlap() {
    let mut first = Ship::new(ShipKind::Destroyer);
    first.add_occupied_cell(c(0, 0));
    first.add_occupied_cell(c(0, 1));
    let mut second = Ship::new(ShipKind::Frigate);
    second.add_occupied_cell(c(0, 1));
    let state = BoardState {
        fleet: vec![first, second],
        shots_fired: vec![],
        hit_history: vec![],
        sunk_count: 0,
    };
    assert_eq!(
        Board::try_from(state),
        Err(BoardStateError::Overlap(c(0, 1)))
    );
}

#[test]
fn test_board_state_rejects_broken_ships() {
    let mut gapped = Ship::new(ShipKind::Destroyer);
    gapped.add_occupied_cell(c(0, 0));
    gapped.add_occupied_cell(c(0, 2));
    let state = BoardState {
        fleet: vec![gapped],
        shots_fired: vec![],
        hit_history: vec![],
        sunk_count: 0,
    };
    assert_eq!(
        Board::try_from(state),
        Err(BoardStateError::ShipShape {
            kind: ShipKind::Destroyer
        })
    );

    let mut short = Ship::new(ShipKind::Carrier);
    short.add_occupied_cell(c(0, 0));
    let state = BoardState {
        fleet: vec![short],
        shots_fired: vec![],
        hit_history: vec![],
        sunk_count: 0,
    };
    assert!(matches!(
        Board::try_from(state),
        Err(BoardStateError::ShipLength { .. })
    ));
}

#[test]
fn test_board_state_rejects_inconsistent_damage() {
    let mut frigate = Ship::new(ShipKind::Frigate);
    frigate.add_occupied_cell(c(4, 4));
    let state = BoardState {
        fleet: vec![frigate.clone()],
        shots_fired: vec![c(4, 4)],
        hit_history: vec![c(4, 4)],
        sunk_count: 0,
    };
    assert!(matches!(
        Board::try_from(state),
        Err(BoardStateError::ShipHealth { .. })
    ));

    frigate.register_hit();
    let state = BoardState {
        fleet: vec![frigate.clone()],
        shots_fired: vec![c(4, 4)],
        hit_history: vec![c(4, 4)],
        sunk_count: 0,
    };
    assert_eq!(
        Board::try_from(state),
        Err(BoardStateError::SunkCount {
            recorded: 0,
            actual: 1
        })
    );

    let state = BoardState {
        fleet: vec![frigate],
        shots_fired: vec![c(4, 4), c(5, 5)],
        hit_history: vec![c(4, 4), c(5, 5)],
        sunk_count: 1,
    };
    assert_eq!(
        Board::try_from(state),
        Err(BoardStateError::StrayHit(c(5, 5)))
    );
}

#[test]
fn test_board_state_rejects_forged_hit_history() {
    let mut board = Board::new();
    board
        .place_ship(Ship::new(ShipKind::Destroyer), c(2, 2), Orientation::Horizontal)
        .unwrap();
    board.receive_shot(c(2, 2)).unwrap();

    let mut state = BoardState::from(&board);
    state.hit_history = vec![c(2, 2); 50];
    assert_eq!(
        Board::try_from(state),
        Err(BoardStateError::DuplicateHit(c(2, 2)))
    );

    let mut state = BoardState::from(&board);
    state.hit_history.clear();
    assert_eq!(
        Board::try_from(state),
        Err(BoardStateError::HitCount {
            recorded: 0,
            actual: 1
        })
    );

    assert!(Board::try_from(BoardState::from(&board)).is_ok());
}
