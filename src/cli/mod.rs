//! Terminal rendering and command parsing for the interactive shell.

use std::fmt::Write as _;

use crate::core::{
    ship_kind_from_name, Board, CellView, Coordinate, FleetTracker, Orientation, ShipKind,
    ShotResult, BOARD_SIZE,
};
use crate::session::{GameEvent, Phase, Side};

/// A line of input, interpreted for the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Place a ship of `kind`, or the next pending ship when no kind is given.
    Place {
        kind: Option<ShipKind>,
        start: Coordinate,
        orientation: Orientation,
    },
    /// Place every remaining ship at random.
    Auto,
    /// Begin the battle once the fleet is placed.
    Start,
    Fire(Coordinate),
    Save,
    Restart,
    Board,
    Help,
    Quit,
}

fn parse_orientation(input: &str) -> Result<Orientation, String> {
    match input.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('H') => Ok(Orientation::Horizontal),
        Some('V') => Ok(Orientation::Vertical),
        Some(other) => Err(format!("Invalid orientation '{other}' - use H or V")),
        None => Ok(Orientation::Horizontal),
    }
}

fn parse_coordinate(label: &str) -> Result<Coordinate, String> {
    label
        .parse()
        .map_err(|e| format!("Invalid coordinate '{label}': {e}"))
}

/// Parse a line of input. Bare coordinates mean placement while placing and
/// a shot during battle. A ship name may lead a placement.
pub fn parse_command(line: &str, phase: Phase) -> Result<Command, String> {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Err("Empty input".to_string());
    };
    let keyword = head.to_ascii_lowercase();
    match keyword.as_str() {
        "auto" => return Ok(Command::Auto),
        "start" => return Ok(Command::Start),
        "save" => return Ok(Command::Save),
        "restart" => return Ok(Command::Restart),
        "board" => return Ok(Command::Board),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        _ => {}
    }

    match phase {
        Phase::Placing => {
            let kind = ship_kind_from_name(head);
            let label = match kind {
                Some(kind) => parts
                    .next()
                    .ok_or_else(|| format!("Where should the {kind} go? e.g. {head} A5 H"))?,
                None => head,
            };
            let start = parse_coordinate(label)?;
            let orientation = parse_orientation(parts.next().unwrap_or(""))?;
            Ok(Command::Place {
                kind,
                start,
                orientation,
            })
        }
        Phase::Battle => parse_coordinate(head).map(Command::Fire),
        Phase::GameOver => Err("The game is over - type 'restart' or 'quit'".to_string()),
    }
}

/// Ship a placement command refers to: the named kind, else the largest one
/// still pending.
pub fn ship_to_place(named: Option<ShipKind>, placement: &FleetTracker) -> Option<ShipKind> {
    named.or_else(|| placement.pending().next())
}

fn cell_char(view: CellView, reveal: bool) -> char {
    match view {
        CellView::Hit => 'X',
        CellView::Sunk => '#',
        CellView::Miss => 'o',
        CellView::Ship if reveal => 'S',
        CellView::Ship | CellView::Water => '.',
    }
}

/// Draw `board` in a box with column letters and row numbers. Ships are only
/// drawn when `reveal` is set.
pub fn render_board(board: &Board, reveal: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "    ╔══════════════════════════╗");
    let _ = write!(out, "    ║    ");
    for c in 0..BOARD_SIZE {
        let _ = write!(out, " {}", (b'A' + c) as char);
    }
    let _ = writeln!(out, "  ║");
    let _ = writeln!(out, "    ╠══════════════════════════╣");
    for r in 0..BOARD_SIZE {
        let _ = write!(out, "    ║ {:2} ", r + 1);
        for c in 0..BOARD_SIZE {
            let view = board.cell(Coordinate::new(r, c));
            let _ = write!(out, " {}", cell_char(view, reveal));
        }
        let _ = writeln!(out, "  ║");
    }
    let _ = writeln!(out, "    ╚══════════════════════════╝");
    if reveal {
        let _ = writeln!(out, "    Legend: S=Ship  X=Hit  #=Sunk  o=Miss  .=Water");
    } else {
        let _ = writeln!(out, "    Legend: X=Hit  #=Sunk  o=Miss  .=Unknown");
    }
    out
}

/// Fleet status lines for a board whose ships are visible.
pub fn render_fleet(board: &Board) -> String {
    let mut out = String::new();
    for ship in board.fleet() {
        let status = if ship.is_sunk() { "SUNK" } else { "Active" };
        let origin = ship
            .origin()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "      {} ({}) at {}: {} [{}/{}]",
            ship.kind(),
            ship.kind().size(),
            origin,
            status,
            ship.health(),
            ship.kind().size()
        );
    }
    out
}

/// Opponent board on top, the player's own board below.
pub fn render_view(player: &Board, enemy: &Board) -> String {
    let mut out = String::from("Enemy waters:\n");
    out.push_str(&render_board(enemy, false));
    out.push_str("\nYour fleet:\n");
    out.push_str(&render_board(player, true));
    out.push_str(&render_fleet(player));
    out
}

/// `m:ss` clock text.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Message for an event, or `None` for events the shell shows elsewhere.
pub fn describe_event(event: &GameEvent) -> Option<String> {
    let text = match event {
        GameEvent::ShotResolved {
            coordinate,
            result,
            board: Side::Ai,
        } => match result {
            ShotResult::Hit => format!("🎯 HIT! Your shot at {coordinate} struck an enemy ship!"),
            ShotResult::Miss => format!("💧 Miss. Your shot at {coordinate} hit only water."),
            ShotResult::Sunk => format!("🎯 HIT at {coordinate}!"),
        },
        GameEvent::ShotResolved {
            coordinate,
            result,
            board: Side::Human,
        } => match result {
            ShotResult::Hit | ShotResult::Sunk => {
                format!("⚠️  ENEMY HIT! They struck your ship at {coordinate}")
            }
            ShotResult::Miss => format!("✓ Enemy missed at {coordinate}"),
        },
        GameEvent::ShipSunk {
            board: Side::Ai,
            ship,
        } => format!("💥 SUNK! You destroyed the enemy's {}!", ship.kind()),
        GameEvent::ShipSunk {
            board: Side::Human,
            ship,
        } => format!("💀 SHIP LOST! Enemy destroyed your {}", ship.kind()),
        GameEvent::TurnChanged(Side::Human) => "Your turn. Enter a target (e.g. B7).".to_string(),
        GameEvent::TurnChanged(Side::Ai) => "Enemy is taking aim...".to_string(),
        GameEvent::TimerTick(_) => return None,
        GameEvent::GameOver { player_won: true } => {
            "🏆 VICTORY! The enemy fleet is at the bottom of the sea.".to_string()
        }
        GameEvent::GameOver { player_won: false } => {
            "☠️  DEFEAT. Your fleet has been destroyed.".to_string()
        }
        GameEvent::PhaseChanged(Phase::Placing) => "═══ SHIP PLACEMENT PHASE ═══".to_string(),
        GameEvent::PhaseChanged(Phase::Battle) => "═══ BATTLE STATIONS ═══".to_string(),
        GameEvent::PhaseChanged(Phase::GameOver) => "═══ GAME OVER ═══".to_string(),
        GameEvent::AutosaveFailed { reason } => format!("✗ Autosave failed: {reason}"),
    };
    Some(text)
}

pub const PLACEMENT_HELP: &str = "\
Placement:
  <COLUMN><ROW> [H|V]   place the next ship, e.g. A5 H or B3 V
  <SHIP> <COLUMN><ROW> [H|V]
                        place a chosen ship, e.g. frigate J1 or carrier A1 V
  auto                  place all remaining ships at random
  start                 begin the battle once every ship is placed
Columns run A-J left to right, rows 1-10 top to bottom.";

pub const BATTLE_HELP: &str = "\
Battle:
  <COLUMN><ROW>         fire at a cell, e.g. B7
  board                 show both boards
  save                  save the game now
  restart               abandon this game and start over
  quit                  save and leave
Symbols: X=Hit  #=Sunk  o=Miss  .=Unknown";
