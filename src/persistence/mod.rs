//! Saving and restoring whole-session snapshots.
//!
//! A [`SnapshotStore`] persists a [`SavedSnapshot`] atomically: a load never
//! observes a half-written save. [`FileSnapshotStore`] is the on-disk format,
//! [`MemorySnapshotStore`] keeps everything in memory, and [`Autosaver`]
//! serializes background saves so they complete in the order they were issued.

use std::fmt::Write as _;

use crate::core::Board;

pub mod autosave;
pub mod file;
pub mod in_memory;

pub use autosave::{AutosaveHandle, Autosaver};
pub use file::FileSnapshotStore;
pub use in_memory::MemorySnapshotStore;

/// Version tag written at the start of every snapshot blob.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Nickname used when a snapshot has no readable status file.
pub const DEFAULT_NICKNAME: &str = "Unknown";

/// Errors raised while saving or loading snapshots. None of them are fatal to
/// a running game.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode snapshot: {0}")]
    Encode(String),

    #[error("failed to decode snapshot: {0}")]
    Decode(String),

    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("save worker has stopped")]
    WorkerStopped,
}

/// Complete session state at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSnapshot {
    pub player_board: Board,
    pub enemy_board: Board,
    pub nickname: String,
    pub elapsed_seconds: u64,
}

impl SavedSnapshot {
    /// Human-readable summary. Only the nickname line is read back on load.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Nickname: {}", self.nickname);
        let _ = writeln!(out, "Player_Shots_Fired: {}", self.enemy_board.shots_fired().len());
        let _ = writeln!(out, "Enemy_Shots_Fired: {}", self.player_board.shots_fired().len());
        let _ = writeln!(out, "Player_Ships_Sunk: {}", self.player_board.sunk_count());
        let _ = writeln!(out, "Enemy_Ships_Sunk: {}", self.enemy_board.sunk_count());
        let _ = writeln!(out, "Time_Elapsed_Seconds: {}", self.elapsed_seconds);
        out
    }
}

/// Extract the nickname from a status summary.
pub fn parse_nickname(summary: &str) -> Option<String> {
    summary
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("Nickname: "))
        .map(|name| name.trim_end().to_string())
}

/// Storage backend for session snapshots.
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist `snapshot`, replacing any previous one.
    async fn save(&self, snapshot: &SavedSnapshot) -> Result<(), PersistenceError>;

    /// Load the last snapshot. Returns `Ok(None)` if nothing was ever saved.
    async fn load(&self) -> Result<Option<SavedSnapshot>, PersistenceError>;
}
