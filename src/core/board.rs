//! Board state: fleet placement, shot tracking and shot resolution.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use rand::Rng;

use crate::core::bitboard::CellSet;
use crate::core::common::{BoardStateError, PlacementError, ShotError, ShotResult};
use crate::core::config::{standard_fleet, BOARD_SIZE};
use crate::core::coordinate::{Coordinate, Orientation};
use crate::core::ship::{Ship, ShipKind};

/// What a single cell looks like to someone who can see the ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Water,
    Ship,
    Miss,
    Hit,
    Sunk,
}

/// Serializable board state for saving games.
///
/// Occupancy is not stored; it is rebuilt from the fleet on conversion back
/// into a [`Board`], which also re-checks every board invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardState {
    pub fleet: Vec<Ship>,
    pub shots_fired: Vec<Coordinate>,
    pub hit_history: Vec<Coordinate>,
    pub sunk_count: usize,
}

/// One player's 10×10 grid: ships, shots received, and sunk ships.
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "std",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "BoardState", into = "BoardState")
)]
pub struct Board {
    /// Occupied cells mapped to an index into `fleet`.
    occupancy: BTreeMap<Coordinate, usize>,
    shots_fired: CellSet,
    /// Cells where a shot connected, in firing order.
    hit_history: Vec<Coordinate>,
    fleet: Vec<Ship>,
    sunk_count: usize,
}

impl Board {
    /// Create an empty board (no ships placed, no shots fired).
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `ship` starting at `start` and extending along `orientation`.
    ///
    /// Every candidate cell is validated before anything is committed, so a
    /// failed placement leaves the board untouched. Returns the ship's index
    /// in the fleet.
    pub fn place_ship(
        &mut self,
        mut ship: Ship,
        start: Coordinate,
        orientation: Orientation,
    ) -> Result<usize, PlacementError> {
        if !ship.positions().is_empty() {
            return Err(PlacementError::AlreadyPlaced);
        }
        let size = ship.kind().size();
        let mut cells = Vec::with_capacity(size);
        for i in 0..size {
            let cell = start
                .offset(orientation, i)
                .filter(Coordinate::is_on_board)
                .ok_or(PlacementError::OutOfBounds)?;
            if self.occupancy.contains_key(&cell) {
                return Err(PlacementError::Overlaps(cell));
            }
            cells.push(cell);
        }

        let index = self.fleet.len();
        for cell in cells {
            self.occupancy.insert(cell, index);
            ship.add_occupied_cell(cell);
        }
        self.fleet.push(ship);
        Ok(index)
    }

    /// Place a new ship of `kind` at a uniformly random origin and orientation,
    /// retrying until a placement succeeds.
    pub fn place_ship_randomly<R: Rng + ?Sized>(&mut self, kind: ShipKind, rng: &mut R) -> usize {
        loop {
            let row = rng.random_range(0..BOARD_SIZE);
            let col = rng.random_range(0..BOARD_SIZE);
            let orientation = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            if let Ok(index) = self.place_ship(Ship::new(kind), Coordinate::new(row, col), orientation)
            {
                return index;
            }
        }
    }

    /// Place the standard fleet at random, one ship at a time with no backtracking.
    pub fn place_ships_randomly<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for kind in standard_fleet() {
            self.place_ship_randomly(kind, rng);
        }
    }

    /// Resolve a shot at `coord`.
    ///
    /// Off-board and repeated shots are rejected without touching the board,
    /// so a cell can never be counted twice.
    pub fn receive_shot(&mut self, coord: Coordinate) -> Result<ShotResult, ShotError> {
        if !coord.is_on_board() {
            return Err(ShotError::OutOfBounds(coord));
        }
        if self.shots_fired.contains(coord) {
            return Err(ShotError::AlreadyFired(coord));
        }
        self.shots_fired.insert(coord);

        let Some(&index) = self.occupancy.get(&coord) else {
            return Ok(ShotResult::Miss);
        };
        let ship = &mut self.fleet[index];
        let was_sunk = ship.is_sunk();
        ship.register_hit();
        self.hit_history.push(coord);
        if ship.is_sunk() && !was_sunk {
            self.sunk_count += 1;
            Ok(ShotResult::Sunk)
        } else {
            Ok(ShotResult::Hit)
        }
    }

    /// Returns `true` when at least one ship is placed and every ship is sunk.
    pub fn all_ships_sunk(&self) -> bool {
        !self.fleet.is_empty() && self.sunk_count == self.fleet.len()
    }

    /// Ships in placement order.
    pub fn fleet(&self) -> &[Ship] {
        &self.fleet
    }

    pub fn shots_fired(&self) -> &CellSet {
        &self.shots_fired
    }

    /// Cells where a shot connected, oldest first.
    pub fn hit_history(&self) -> &[Coordinate] {
        &self.hit_history
    }

    pub fn sunk_count(&self) -> usize {
        self.sunk_count
    }

    pub fn ships_afloat(&self) -> usize {
        self.fleet.len() - self.sunk_count
    }

    pub fn has_been_fired_at(&self, coord: Coordinate) -> bool {
        self.shots_fired.contains(coord)
    }

    pub fn ship_index_at(&self, coord: Coordinate) -> Option<usize> {
        self.occupancy.get(&coord).copied()
    }

    pub fn ship_at(&self, coord: Coordinate) -> Option<&Ship> {
        self.ship_index_at(coord).and_then(|i| self.fleet.get(i))
    }

    /// Render state of a cell, with ships visible.
    pub fn cell(&self, coord: Coordinate) -> CellView {
        let fired = self.shots_fired.contains(coord);
        match (self.ship_at(coord), fired) {
            (Some(ship), true) if ship.is_sunk() => CellView::Sunk,
            (Some(_), true) => CellView::Hit,
            (Some(_), false) => CellView::Ship,
            (None, true) => CellView::Miss,
            (None, false) => CellView::Water,
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  shots_fired: {:?},\n  sunk: {}/{},\n  fleet: {:?}\n}}",
            self.shots_fired,
            self.sunk_count,
            self.fleet.len(),
            self.fleet
        )
    }
}

impl From<&Board> for BoardState {
    fn from(b: &Board) -> Self {
        BoardState {
            fleet: b.fleet.clone(),
            shots_fired: b.shots_fired.iter().collect(),
            hit_history: b.hit_history.clone(),
            sunk_count: b.sunk_count,
        }
    }
}

impl From<Board> for BoardState {
    fn from(b: Board) -> Self {
        BoardState {
            shots_fired: b.shots_fired.iter().collect(),
            fleet: b.fleet,
            hit_history: b.hit_history,
            sunk_count: b.sunk_count,
        }
    }
}

impl TryFrom<BoardState> for Board {
    type Error = BoardStateError;

    fn try_from(state: BoardState) -> Result<Self, Self::Error> {
        let mut shots_fired = CellSet::new();
        for &shot in &state.shots_fired {
            if !shot.is_on_board() {
                return Err(BoardStateError::OutOfBounds(shot));
            }
            shots_fired.insert(shot);
        }

        let mut occupancy = BTreeMap::new();
        for (index, ship) in state.fleet.iter().enumerate() {
            let kind = ship.kind();
            let cells = ship.positions();
            if cells.len() != kind.size() {
                return Err(BoardStateError::ShipLength {
                    kind,
                    cells: cells.len(),
                    expected: kind.size(),
                });
            }
            let orientation = ship.orientation();
            for (i, &cell) in cells.iter().enumerate() {
                if !cell.is_on_board() {
                    return Err(BoardStateError::OutOfBounds(cell));
                }
                if cells[0].offset(orientation, i) != Some(cell) {
                    return Err(BoardStateError::ShipShape { kind });
                }
                if occupancy.insert(cell, index).is_some() {
                    return Err(BoardStateError::Overlap(cell));
                }
            }
            let hits = cells.iter().filter(|&&c| shots_fired.contains(c)).count();
            if ship.health() as usize != kind.size() - hits {
                return Err(BoardStateError::ShipHealth {
                    kind,
                    health: ship.health(),
                });
            }
        }

        let actual = state.fleet.iter().filter(|s| s.is_sunk()).count();
        if state.sunk_count != actual {
            return Err(BoardStateError::SunkCount {
                recorded: state.sunk_count,
                actual,
            });
        }

        let mut seen = CellSet::new();
        for &hit in &state.hit_history {
            if !shots_fired.contains(hit) || !occupancy.contains_key(&hit) {
                return Err(BoardStateError::StrayHit(hit));
            }
            if !seen.insert(hit) {
                return Err(BoardStateError::DuplicateHit(hit));
            }
        }
        let struck = occupancy.keys().filter(|&&c| shots_fired.contains(c)).count();
        if state.hit_history.len() != struck {
            return Err(BoardStateError::HitCount {
                recorded: state.hit_history.len(),
                actual: struck,
            });
        }

        Ok(Board {
            occupancy,
            shots_fired,
            hit_history: state.hit_history,
            fleet: state.fleet,
            sunk_count: state.sunk_count,
        })
    }
}
