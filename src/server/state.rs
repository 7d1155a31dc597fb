//! Shared application state for the HTTP server.

use axum::extract::ws::{Message, WebSocket};
use chrono::{DateTime, Utc};
use futures::stream::SplitSink;
use std::sync::Arc;

use crate::slideshow::{Broadcaster, SlideState, ViewerRegistry};

/// Outbound half of a viewer's WebSocket.
pub type WsSink = SplitSink<WebSocket, Message>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Slide state and viewer fan-out.
    pub broadcaster: Broadcaster<WsSink>,

    /// When the server started.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Creates app state around a fresh slide and an empty viewer set.
    pub fn new() -> Self {
        Self::with_state(Arc::new(SlideState::new()))
    }

    /// Creates app state around an existing slide cell.
    pub fn with_state(slides: Arc<SlideState>) -> Self {
        Self {
            broadcaster: Broadcaster::new(slides, Arc::new(ViewerRegistry::new())),
            started_at: Utc::now(),
        }
    }

    pub fn slides(&self) -> &SlideState {
        self.broadcaster.state()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
