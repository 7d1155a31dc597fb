//! Fan-out of the current slide to every registered viewer.

use axum::extract::ws::Message;
use futures::future::join_all;
use futures::Sink;
use std::fmt;
use std::sync::Arc;

use super::registry::{Viewer, ViewerRegistry};
use super::state::SlideState;
use super::types::SlideData;
use crate::error::Result;

/// Outcome of a single publish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Viewers that received the slide.
    pub delivered: usize,
    /// Viewers removed because the send failed.
    pub dropped: usize,
}

/// Pushes the shared slide to all viewers.
///
/// Holds the state cell and the registry it was built with; both are
/// owned by the application and injected here.
pub struct Broadcaster<S> {
    state: Arc<SlideState>,
    viewers: Arc<ViewerRegistry<S>>,
}

impl<S> Clone for Broadcaster<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            viewers: Arc::clone(&self.viewers),
        }
    }
}

impl<S> Broadcaster<S>
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    pub fn new(state: Arc<SlideState>, viewers: Arc<ViewerRegistry<S>>) -> Self {
        Self { state, viewers }
    }

    pub fn state(&self) -> &Arc<SlideState> {
        &self.state
    }

    pub fn viewers(&self) -> &Arc<ViewerRegistry<S>> {
        &self.viewers
    }

    /// Stores a new slide and pushes it to every viewer.
    pub async fn update(&self, slide: SlideData) -> PublishReport {
        self.state.set(slide);
        self.publish().await
    }

    /// Sends the current slide to every registered viewer.
    ///
    /// Viewers whose send fails are closed and unregistered. Failures never
    /// stop delivery to the others.
    pub async fn publish(&self) -> PublishReport {
        let slide = self.state.get();
        let viewers = self.viewers.snapshot();

        let message = match encode(&slide) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode slide");
                return PublishReport::default();
            }
        };

        // Sends run concurrently so a stalled viewer only holds up itself.
        let sends = viewers.iter().map(|viewer| {
            let message = message.clone();
            async move {
                match viewer.send(message).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::debug!(viewer = %viewer.id(), error = %e, "Broadcast send failed");
                        self.remove(viewer).await;
                        false
                    }
                }
            }
        });
        let results = join_all(sends).await;

        let delivered = results.iter().filter(|ok| **ok).count();
        let report = PublishReport {
            delivered,
            dropped: results.len() - delivered,
        };
        tracing::debug!(
            delivered = report.delivered,
            dropped = report.dropped,
            "Slide broadcast"
        );
        report
    }

    /// Registers a new viewer and sends it the current slide.
    ///
    /// The slide is read and sent while the viewer's write lock is still
    /// held from registration, so no broadcast can overtake it. On failure
    /// the viewer is removed again.
    pub async fn attach(&self, sink: S) -> Result<Arc<Viewer<S>>> {
        let (viewer, mut writer) = self.viewers.register(sink).await;
        tracing::info!(
            viewer = %viewer.id(),
            viewers = self.viewers.len(),
            "Viewer connected"
        );

        let sent = match encode(&self.state.get()) {
            Ok(message) => writer.send(message).await,
            Err(e) => Err(e),
        };
        drop(writer);

        if let Err(e) = sent {
            self.remove(&viewer).await;
            return Err(e);
        }
        Ok(viewer)
    }

    /// Unregisters then closes a viewer. Safe to call from several paths.
    pub async fn remove(&self, viewer: &Viewer<S>) {
        if self.viewers.unregister(viewer.id()).is_some() {
            tracing::info!(
                viewer = %viewer.id(),
                viewers = self.viewers.len(),
                "Viewer disconnected"
            );
        }
        viewer.close().await;
    }

    /// Disconnects every viewer. Used on shutdown.
    pub async fn close_all(&self) {
        let viewers = self.viewers.drain();
        let count = viewers.len();
        join_all(viewers.iter().map(|viewer| viewer.close())).await;
        tracing::info!(viewers = count, "Closed all viewers");
    }
}

fn encode(slide: &SlideData) -> Result<Message> {
    Ok(Message::Text(serde_json::to_string(slide)?))
}
