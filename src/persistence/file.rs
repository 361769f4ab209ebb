//! On-disk snapshot store.
//!
//! A save writes two files into the store directory:
//!
//! - `broadside_data.bin`: bincode blob with a version tag, both boards and
//!   the elapsed seconds.
//! - `broadside_status.txt`: the text summary from [`SavedSnapshot::summary`].
//!
//! Each file is written to a temp path and renamed into place, and the blob
//! is renamed last, so a crash mid-save leaves the previous blob intact.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{
    parse_nickname, PersistenceError, SavedSnapshot, SnapshotStore, DEFAULT_NICKNAME,
    SNAPSHOT_VERSION,
};
use crate::core::Board;

pub const DATA_FILE: &str = "broadside_data.bin";
pub const STATUS_FILE: &str = "broadside_status.txt";

#[derive(Serialize, Deserialize)]
struct SnapshotBlob {
    version: u32,
    player_board: Board,
    enemy_board: Board,
    elapsed_seconds: u64,
}

/// Snapshot store backed by two files in one directory.
pub struct FileSnapshotStore {
    dir: PathBuf,
    /// Serializes file access so a load never interleaves with a save.
    lock: Mutex<()>,
}

impl FileSnapshotStore {
    /// Store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn data_path(&self) -> PathBuf {
        self.dir.join(DATA_FILE)
    }

    pub fn status_path(&self) -> PathBuf {
        self.dir.join(STATUS_FILE)
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)
}

/// The blob lands first so the status file never describes a save that failed.
fn write_files(dir: &Path, blob: &[u8], summary: &str) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    write_atomic(&dir.join(DATA_FILE), blob)?;
    write_atomic(&dir.join(STATUS_FILE), summary.as_bytes())
}

fn read_files(dir: &Path) -> io::Result<Option<(Vec<u8>, Option<String>)>> {
    let blob = match fs::read(dir.join(DATA_FILE)) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let summary = match fs::read_to_string(dir.join(STATUS_FILE)) {
        Ok(text) => Some(text),
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                log::warn!("Ignoring unreadable status file: {e}");
            }
            None
        }
    };
    Ok(Some((blob, summary)))
}

fn decode(blob: &[u8], summary: Option<&str>) -> Result<SavedSnapshot, PersistenceError> {
    // The version tag is read on its own first so an older layout is reported
    // as such rather than as garbage.
    let version: u32 =
        bincode::deserialize(blob).map_err(|e| PersistenceError::Decode(e.to_string()))?;
    if version != SNAPSHOT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: version,
            expected: SNAPSHOT_VERSION,
        });
    }
    let decoded: SnapshotBlob =
        bincode::deserialize(blob).map_err(|e| PersistenceError::Decode(e.to_string()))?;

    let nickname = summary
        .and_then(parse_nickname)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_NICKNAME.to_string());

    Ok(SavedSnapshot {
        player_board: decoded.player_board,
        enemy_board: decoded.enemy_board,
        nickname,
        elapsed_seconds: decoded.elapsed_seconds,
    })
}

fn join_error(e: tokio::task::JoinError) -> PersistenceError {
    PersistenceError::Io(io::Error::other(e))
}

#[async_trait::async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn save(&self, snapshot: &SavedSnapshot) -> Result<(), PersistenceError> {
        let blob = SnapshotBlob {
            version: SNAPSHOT_VERSION,
            player_board: snapshot.player_board.clone(),
            enemy_board: snapshot.enemy_board.clone(),
            elapsed_seconds: snapshot.elapsed_seconds,
        };
        let bytes =
            bincode::serialize(&blob).map_err(|e| PersistenceError::Encode(e.to_string()))?;
        let summary = snapshot.summary();

        let _guard = self.lock.lock().await;
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || write_files(&dir, &bytes, &summary))
            .await
            .map_err(join_error)??;

        log::debug!("Saved snapshot to {}", self.data_path().display());
        Ok(())
    }

    async fn load(&self) -> Result<Option<SavedSnapshot>, PersistenceError> {
        let _guard = self.lock.lock().await;
        let dir = self.dir.clone();
        let files = tokio::task::spawn_blocking(move || read_files(&dir))
            .await
            .map_err(join_error)??;

        let Some((blob, summary)) = files else {
            log::debug!("No snapshot found in {}", self.dir.display());
            return Ok(None);
        };
        let snapshot = decode(&blob, summary.as_deref())?;
        log::debug!("Loaded snapshot from {}", self.data_path().display());
        Ok(Some(snapshot))
    }
}
