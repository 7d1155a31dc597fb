//! Health check endpoint.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::server::state::AppState;

/// GET /health - Liveness probe with viewer count and last update time.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "viewers": state.broadcaster.viewers().len(),
        "updated_at": state.slides().updated_at().map(|t| t.to_rfc3339()),
        "started_at": state.started_at.to_rfc3339(),
    }))
}
