//! Slide update and query endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::server::state::AppState;
use crate::slideshow::SlideData;

/// POST /api/slideshow - Replace the current slide and push it to all viewers.
///
/// The body is parsed as JSON whatever its content type. A body that is not
/// a complete slide is rejected with 400 and changes nothing.
pub async fn update_slide(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let slide = match SlideData::from_json(&body) {
        Ok(slide) => slide,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected slide update");
            return (StatusCode::BAD_REQUEST, "Invalid request body").into_response();
        }
    };

    let report = state.broadcaster.update(slide).await;
    tracing::info!(
        delivered = report.delivered,
        dropped = report.dropped,
        "Slide updated"
    );

    Json(json!({ "status": "success" })).into_response()
}

/// GET /api/slideshow/current - Current slide.
pub async fn get_current_slide(State(state): State<Arc<AppState>>) -> Json<SlideData> {
    Json(state.slides().get())
}
