use broadside::{Coordinate, Orientation, ParseCoordinateError, BOARD_SIZE};

#[test]
fn test_display_uses_column_letter_and_one_based_row() {
    assert_eq!(Coordinate::new(0, 0).to_string(), "A1");
    assert_eq!(Coordinate::new(9, 9).to_string(), "J10");
    assert_eq!(Coordinate::new(6, 1).to_string(), "B7");
}

#[test]
fn test_parse_round_trips_display() {
    for coord in Coordinate::all() {
        let parsed: Coordinate = coord.to_string().parse().unwrap();
        assert_eq!(parsed, coord);
    }
}

#[test]
fn test_parse_is_case_insensitive_and_trims() {
    assert_eq!(" b7 ".parse::<Coordinate>().unwrap(), Coordinate::new(6, 1));
}

#[test]
fn test_parse_rejects_out_of_range() {
    assert_eq!("".parse::<Coordinate>(), Err(ParseCoordinateError::Empty));
    assert_eq!(
        "K1".parse::<Coordinate>(),
        Err(ParseCoordinateError::InvalidColumn('K'))
    );
    assert_eq!("A0".parse::<Coordinate>(), Err(ParseCoordinateError::InvalidRow));
    assert_eq!("A11".parse::<Coordinate>(), Err(ParseCoordinateError::InvalidRow));
    assert_eq!("Ax".parse::<Coordinate>(), Err(ParseCoordinateError::InvalidRow));
}

#[test]
fn test_all_is_row_major_and_on_board() {
    let cells: Vec<Coordinate> = Coordinate::all().collect();
    assert_eq!(cells.len(), (BOARD_SIZE as usize).pow(2));
    assert_eq!(cells[0], Coordinate::new(0, 0));
    assert_eq!(cells[1], Coordinate::new(0, 1));
    assert_eq!(cells[10], Coordinate::new(1, 0));
    assert!(cells.iter().all(Coordinate::is_on_board));
}

#[test]
fn test_offset_follows_orientation() {
    let origin = Coordinate::new(2, 3);
    assert_eq!(origin.offset(Orientation::Horizontal, 2), Some(Coordinate::new(2, 5)));
    assert_eq!(origin.offset(Orientation::Vertical, 2), Some(Coordinate::new(4, 3)));
    assert_eq!(Coordinate::new(0, 250).offset(Orientation::Horizontal, 10), None);
    assert!(!Coordinate::new(0, 8)
        .offset(Orientation::Horizontal, 3)
        .unwrap()
        .is_on_board());
}

#[test]
fn test_coordinates_compare_structurally() {
    use std::collections::HashSet;
    let set: HashSet<Coordinate> = [Coordinate::new(1, 2), Coordinate::new(1, 2)].into();
    assert_eq!(set.len(), 1);
    assert_eq!(Orientation::Horizontal.rotated(), Orientation::Vertical);
}

#[test]
fn test_display_of_off_board_coordinates_uses_raw_indices() {
    assert_eq!(Coordinate::new(0, 10).to_string(), "(0,10)");
    assert_eq!(Coordinate::new(0, 30).to_string(), "(0,30)");
    assert_eq!(Coordinate::new(0, 200).to_string(), "(0,200)");
    assert_eq!(Coordinate::new(255, 255).to_string(), "(255,255)");
    assert!("(0,30)".parse::<Coordinate>().is_err());
}
