use super::board::Board;
use super::ship::ShipKind;

pub const BOARD_SIZE: u8 = 10;

/// Number of distinct ship kinds.
pub const SHIP_KINDS: usize = 4;

/// Ship kinds and how many of each make up a standard fleet.
pub const STANDARD_FLEET: [(ShipKind, usize); SHIP_KINDS] = [
    (ShipKind::Carrier, 1),
    (ShipKind::Submarine, 2),
    (ShipKind::Destroyer, 3),
    (ShipKind::Frigate, 4),
];

/// Number of ships in the standard fleet.
pub const FLEET_SIZE: usize = 1 + 2 + 3 + 4;

/// Total number of ship segments used in the standard configuration.
pub const TOTAL_SHIP_CELLS: usize = 4 + 3 * 2 + 2 * 3 + 4;

/// Ship kinds of the standard fleet in placement order, largest first.
pub fn standard_fleet() -> impl Iterator<Item = ShipKind> {
    STANDARD_FLEET
        .iter()
        .flat_map(|&(kind, count)| core::iter::repeat(kind).take(count))
}

/// Convert a ship name to its kind, ignoring case. Returns `None` if the name
/// does not match any kind in the standard fleet.
pub fn ship_kind_from_name(name: &str) -> Option<ShipKind> {
    STANDARD_FLEET
        .iter()
        .map(|&(kind, _)| kind)
        .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
}

/// Remaining ships to place per kind during the placement phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetTracker {
    remaining: [usize; SHIP_KINDS],
}

impl FleetTracker {
    /// Tracker expecting the full standard fleet.
    pub fn new() -> Self {
        Self {
            remaining: STANDARD_FLEET.map(|(_, count)| count),
        }
    }

    /// Tracker for a board that may already carry some ships.
    pub fn for_board(board: &Board) -> Self {
        let mut tracker = Self::new();
        for ship in board.fleet() {
            tracker.record(ship.kind());
        }
        tracker
    }

    fn slot(kind: ShipKind) -> usize {
        STANDARD_FLEET
            .iter()
            .position(|&(k, _)| k == kind)
            .unwrap_or_default()
    }

    /// Ships of `kind` still to be placed.
    pub fn remaining(&self, kind: ShipKind) -> usize {
        self.remaining[Self::slot(kind)]
    }

    /// Total ships still to be placed.
    pub fn total_remaining(&self) -> usize {
        self.remaining.iter().sum()
    }

    /// Record a successful placement. Returns `false` if none of `kind` were left.
    pub fn record(&mut self, kind: ShipKind) -> bool {
        let slot = &mut self.remaining[Self::slot(kind)];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn is_complete(&self) -> bool {
        self.total_remaining() == 0
    }

    /// Kinds that still have ships to place, largest first.
    pub fn pending(&self) -> impl Iterator<Item = ShipKind> + '_ {
        STANDARD_FLEET
            .iter()
            .zip(self.remaining.iter())
            .flat_map(|(&(kind, _), &left)| core::iter::repeat(kind).take(left))
    }
}

impl Default for FleetTracker {
    fn default() -> Self {
        Self::new()
    }
}
