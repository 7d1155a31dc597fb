//! WebSocket endpoint for live slide updates.

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use std::sync::Arc;

use crate::server::state::AppState;
use crate::slideshow::run_viewer;

/// WebSocket upgrade handler.
///
/// A request that cannot be upgraded is answered with a server error and
/// never reaches the viewer registry.
pub async fn ws_handler(
    State(state): State<Arc<AppState>>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "WebSocket upgrade rejected");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not upgrade connection",
            )
                .into_response();
        }
    };

    ws.on_failed_upgrade(|e| tracing::warn!(error = %e, "WebSocket upgrade failed"))
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handles an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();
    run_viewer(state.broadcaster.clone(), sender, receiver).await;
    tracing::debug!("WebSocket connection closed");
}
