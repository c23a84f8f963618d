use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the size of the current board.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.snapshot();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "jobhub",
        "jobs": snapshot.jobs.len(),
        "revision": snapshot.revision,
    }))
}
