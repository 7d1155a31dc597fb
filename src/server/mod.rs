//! HTTP server module for API and WebSocket endpoints.
//!
//! Provides the slide update API, the live WebSocket feed and the static
//! frontend.

pub mod routes;
pub mod state;
pub mod ws;

use crate::config::ServerConfig;
use crate::error::Result;
use crate::server::routes::{health, slideshow};
use crate::server::state::AppState;
use crate::server::ws::ws_handler;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// CORS layer that lets any origin call the API.
///
/// Preflight requests are answered here and never reach the handlers.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::POST,
            Method::GET,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            header::ACCEPT_ENCODING,
            header::AUTHORIZATION,
        ])
}

/// Assembles the full router.
///
/// Paths that match no route are served from `static_dir`, with
/// `index.html` standing in for anything that is not a file so the
/// frontend can do its own routing.
pub fn build_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let frontend = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Slideshow API
        .route("/api/slideshow", post(slideshow::update_slide))
        .route("/api/slideshow/current", get(slideshow::get_current_slide))
        // WebSocket
        .route("/ws", get(ws_handler))
        .fallback_service(frontend)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the server until `shutdown` resolves, then disconnects all viewers.
pub async fn run_server(
    config: ServerConfig,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        static_dir = %config.static_dir.display(),
        "HTTP server listening"
    );

    let app = build_router(Arc::clone(&state), &config.static_dir);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    state.broadcaster.close_all().await;
    tracing::info!("HTTP server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(state: &Arc<AppState>, dir: &Path) -> Router {
        build_router(Arc::clone(state), dir)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn frontend_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>app</html>").unwrap();
        std::fs::write(dir.path().join("robots.txt"), "User-agent: *").unwrap();
        dir
    }

    fn post_slide(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/slideshow")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_update_then_get_current() {
        let dir = frontend_dir();
        let state = Arc::new(AppState::new());
        let slide = json!({
            "image": "a.jpg",
            "text": [],
            "text-color": "#fff",
            "transition-effect": "fade",
            "transition-time": 500,
        });

        let response = app(&state, dir.path())
            .oneshot(post_slide(&slide.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let ack: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(ack, json!({"status": "success"}));

        let response = app(&state, dir.path())
            .oneshot(get("/api/slideshow/current"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let current: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(current, slide);
    }

    #[tokio::test]
    async fn test_malformed_update_keeps_state() {
        let dir = frontend_dir();
        let state = Arc::new(AppState::new());
        let before = state.slides().get();

        for body in [
            "not json",
            r#"{"image": "a.jpg"}"#,
            r#"{"image": 1, "text": [], "text-color": "", "transition-effect": "", "transition-time": 0}"#,
        ] {
            let response = app(&state, dir.path()).oneshot(post_slide(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_string(response).await, "Invalid request body");
        }

        assert_eq!(state.slides().get(), before);
        assert!(state.slides().updated_at().is_none());
    }

    #[tokio::test]
    async fn test_update_without_content_type_is_accepted() {
        let dir = frontend_dir();
        let state = Arc::new(AppState::new());
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/slideshow")
            .body(Body::from(
                r#"{"image": "b.jpg", "text": [], "text-color": "", "transition-effect": "", "transition-time": 0}"#,
            ))
            .unwrap();

        let response = app(&state, dir.path()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.slides().get().image, "b.jpg");
    }

    #[tokio::test]
    async fn test_wrong_method_is_rejected() {
        let dir = frontend_dir();
        let state = Arc::new(AppState::new());

        let response = app(&state, dir.path()).oneshot(get("/api/slideshow")).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_preflight_short_circuits() {
        let dir = frontend_dir();
        let state = Arc::new(AppState::new());
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/slideshow")
            .header(header::ORIGIN, "http://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app(&state, dir.path()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert!(body_string(response).await.is_empty());
        assert!(state.slides().updated_at().is_none());
    }

    #[tokio::test]
    async fn test_responses_allow_any_origin() {
        let dir = frontend_dir();
        let state = Arc::new(AppState::new());
        let request = Request::builder()
            .uri("/api/slideshow/current")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();

        let response = app(&state, dir.path()).oneshot(request).await.unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_plain_get_on_ws_is_server_error() {
        let dir = frontend_dir();
        let state = Arc::new(AppState::new());

        let response = app(&state, dir.path()).oneshot(get("/ws")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "Could not upgrade connection");
        assert!(state.broadcaster.viewers().is_empty());
    }

    #[tokio::test]
    async fn test_static_files_and_index_fallback() {
        let dir = frontend_dir();
        let state = Arc::new(AppState::new());

        let response = app(&state, dir.path()).oneshot(get("/robots.txt")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "User-agent: *");

        let response = app(&state, dir.path()).oneshot(get("/slideshow")).await.unwrap();
        assert_eq!(body_string(response).await, "<html>app</html>");
    }

    #[tokio::test]
    async fn test_health_reports_viewers() {
        let dir = frontend_dir();
        let state = Arc::new(AppState::new());

        let response = app(&state, dir.path()).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let health: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["viewers"], 0);
        assert!(health["updated_at"].is_null());
    }
}
