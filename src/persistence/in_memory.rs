use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::{PersistenceError, SavedSnapshot, SnapshotStore};

/// Snapshot store that keeps the latest save in memory.
///
/// Useful for tests and for games that do not need to survive a restart.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    latest: Mutex<Option<SavedSnapshot>>,
    saves: AtomicUsize,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `snapshot`, as if it had been saved earlier.
    pub fn with_snapshot(snapshot: SavedSnapshot) -> Self {
        Self {
            latest: Mutex::new(Some(snapshot)),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of saves completed.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn latest(&self) -> Option<SavedSnapshot> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait::async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn save(&self, snapshot: &SavedSnapshot) -> Result<(), PersistenceError> {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load(&self) -> Result<Option<SavedSnapshot>, PersistenceError> {
        Ok(self.latest())
    }
}
