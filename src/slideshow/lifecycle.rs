//! Per-connection lifecycle: register, send the current slide, wait for
//! disconnect, unregister.

use axum::extract::ws::Message;
use futures::{Sink, Stream, StreamExt};
use std::fmt;

use super::broadcaster::Broadcaster;

/// Drives one viewer from registration until its transport goes away.
///
/// Inbound messages are read and discarded; they only serve to notice the
/// peer leaving. Returns once the viewer has been unregistered and closed.
pub async fn run_viewer<S, R, E>(broadcaster: Broadcaster<S>, sink: S, mut inbound: R)
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: fmt::Display,
{
    let viewer = match broadcaster.attach(sink).await {
        Ok(viewer) => viewer,
        Err(e) => {
            tracing::debug!(error = %e, "Initial slide send failed");
            return;
        }
    };

    while let Some(msg) = inbound.next().await {
        match msg {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(viewer = %viewer.id(), error = %e, "Viewer read failed");
                break;
            }
        }
    }

    broadcaster.remove(&viewer).await;
}
