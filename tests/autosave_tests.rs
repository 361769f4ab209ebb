use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use broadside::persistence::Autosaver;
use broadside::{
    Board, GameEvent, MemorySnapshotStore, PersistenceError, SavedSnapshot, SnapshotStore,
};
use tokio::sync::mpsc;

fn snapshot(elapsed_seconds: u64) -> SavedSnapshot {
    SavedSnapshot {
        player_board: Board::new(),
        enemy_board: Board::new(),
        nickname: "Tester".to_string(),
        elapsed_seconds,
    }
}

/// Records the order saves arrive in. Earlier saves take longer, so any
/// concurrency in the writer would reorder them.
#[derive(Default)]
struct SlowRecorder {
    order: Mutex<Vec<u64>>,
}

#[async_trait]
impl SnapshotStore for SlowRecorder {
    async fn save(&self, snapshot: &SavedSnapshot) -> Result<(), PersistenceError> {
        let delay = 10u64.saturating_sub(snapshot.elapsed_seconds) * 3;
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.order.lock().unwrap().push(snapshot.elapsed_seconds);
        Ok(())
    }

    async fn load(&self) -> Result<Option<SavedSnapshot>, PersistenceError> {
        Ok(None)
    }
}

struct FailingStore;

#[async_trait]
impl SnapshotStore for FailingStore {
    async fn save(&self, _snapshot: &SavedSnapshot) -> Result<(), PersistenceError> {
        Err(PersistenceError::Io(std::io::Error::other("disk full")))
    }

    async fn load(&self) -> Result<Option<SavedSnapshot>, PersistenceError> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_saves_complete_in_issue_order() {
    let store = Arc::new(SlowRecorder::default());
    let (tx, _rx) = mpsc::unbounded_channel();
    let autosaver = Autosaver::spawn(store.clone(), tx);
    for i in 1..=8 {
        assert!(autosaver.submit(snapshot(i)));
    }
    autosaver.flush().await;
    assert_eq!(*store.order.lock().unwrap(), (1..=8).collect::<Vec<_>>());
    autosaver.shutdown().await;
}

#[tokio::test]
async fn test_last_save_wins() {
    let store = Arc::new(MemorySnapshotStore::new());
    let (tx, _rx) = mpsc::unbounded_channel();
    let autosaver = Autosaver::spawn(store.clone(), tx);
    let handle = autosaver.handle();
    handle.submit(snapshot(1));
    handle.submit(snapshot(2));
    autosaver.save(snapshot(3)).await.unwrap();
    assert_eq!(store.save_count(), 3);
    assert_eq!(store.latest().unwrap().elapsed_seconds, 3);
    drop(handle);
    autosaver.shutdown().await;
}

#[tokio::test]
async fn test_failed_autosave_is_reported_not_fatal() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let autosaver = Autosaver::spawn(Arc::new(FailingStore), tx);
    assert!(autosaver.submit(snapshot(1)));
    autosaver.flush().await;
    match rx.recv().await {
        Some(GameEvent::AutosaveFailed { reason }) => assert!(reason.contains("disk full")),
        other => panic!("expected an autosave failure, got {other:?}"),
    }

    let explicit = autosaver.save(snapshot(2)).await;
    assert!(matches!(explicit, Err(PersistenceError::Io(_))));
    autosaver.shutdown().await;
}
