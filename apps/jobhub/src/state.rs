use tokio::sync::watch;

use crate::board::{SharedBoard, Snapshot};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Mutations take the lock; one request performs at most one mutation.
    pub board: SharedBoard,
    /// Latest published snapshot, read by the page renderer without locking.
    pub snapshots: watch::Receiver<Snapshot>,
}

impl AppState {
    pub async fn new(board: SharedBoard) -> Self {
        let snapshots = board.lock().await.subscribe();
        Self { board, snapshots }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }
}
