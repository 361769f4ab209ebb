//! Single-writer save queue.
//!
//! Every snapshot goes through one worker task, so saves reach the store in
//! the order they were issued. Failed background saves are logged and reported
//! as [`GameEvent::AutosaveFailed`]; the game keeps going.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::{PersistenceError, SavedSnapshot, SnapshotStore};
use crate::session::events::{emit, EventSender, GameEvent};

enum Command {
    Save {
        snapshot: Box<SavedSnapshot>,
        reply: Option<oneshot::Sender<Result<(), PersistenceError>>>,
    },
    Flush {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable handle for queueing saves.
#[derive(Clone, Debug)]
pub struct AutosaveHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Save { .. } => f.write_str("Save"),
            Command::Flush { .. } => f.write_str("Flush"),
        }
    }
}

impl AutosaveHandle {
    /// Queue a save without waiting for it. Returns `false` if the worker has
    /// already shut down.
    pub fn submit(&self, snapshot: SavedSnapshot) -> bool {
        self.tx
            .send(Command::Save {
                snapshot: Box::new(snapshot),
                reply: None,
            })
            .is_ok()
    }

    /// Queue a save and wait for its outcome.
    pub async fn save(&self, snapshot: SavedSnapshot) -> Result<(), PersistenceError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Save {
                snapshot: Box::new(snapshot),
                reply: Some(reply),
            })
            .map_err(|_| PersistenceError::WorkerStopped)?;
        rx.await.map_err(|_| PersistenceError::WorkerStopped)?
    }

    /// Wait until every save queued before this call has finished.
    pub async fn flush(&self) {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Command::Flush { reply }).is_ok() {
            let _ = rx.await;
        }
    }
}

/// Owner of the save worker.
///
/// The worker runs until every [`AutosaveHandle`] and the `Autosaver` itself
/// are dropped; [`Autosaver::shutdown`] waits for that to happen.
#[derive(Debug)]
pub struct Autosaver {
    handle: AutosaveHandle,
    worker: JoinHandle<()>,
}

impl Autosaver {
    /// Spawn the worker on the current tokio runtime.
    pub fn spawn(store: Arc<dyn SnapshotStore>, events: EventSender) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(store, rx, events));
        Self {
            handle: AutosaveHandle { tx },
            worker,
        }
    }

    pub fn handle(&self) -> AutosaveHandle {
        self.handle.clone()
    }

    pub fn submit(&self, snapshot: SavedSnapshot) -> bool {
        self.handle.submit(snapshot)
    }

    pub async fn save(&self, snapshot: SavedSnapshot) -> Result<(), PersistenceError> {
        self.handle.save(snapshot).await
    }

    pub async fn flush(&self) {
        self.handle.flush().await
    }

    /// Drain the queue and stop the worker. Outstanding handles held elsewhere
    /// keep it alive until they are dropped.
    pub async fn shutdown(self) {
        let Autosaver { handle, worker } = self;
        drop(handle);
        if let Err(e) = worker.await {
            log::error!("Autosave worker panicked: {e}");
        }
    }
}

async fn run_worker(
    store: Arc<dyn SnapshotStore>,
    mut rx: mpsc::UnboundedReceiver<Command>,
    events: EventSender,
) {
    log::debug!("Autosave worker started");
    while let Some(command) = rx.recv().await {
        match command {
            Command::Save { snapshot, reply } => {
                let result = store.save(&snapshot).await;
                match reply {
                    Some(reply) => {
                        let _ = reply.send(result);
                    }
                    None => {
                        if let Err(e) = result {
                            log::warn!("Autosave failed: {e}");
                            emit(
                                &events,
                                GameEvent::AutosaveFailed {
                                    reason: e.to_string(),
                                },
                            );
                        }
                    }
                }
            }
            Command::Flush { reply } => {
                let _ = reply.send(());
            }
        }
    }
    log::debug!("Autosave worker stopped");
}
