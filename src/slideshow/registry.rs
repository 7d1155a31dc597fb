//! Registry of connected viewers.
//!
//! Each viewer owns its outbound sink behind a dedicated write lock. The
//! sink and its lock live in the same `Viewer`, so a registry entry can
//! never exist without its lock or the other way around.

use axum::extract::ws::Message;
use futures::{Sink, SinkExt};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::error::{Error, Result};

/// Stable handle identifying one viewer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewerId(u64);

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered viewer and its write lock.
///
/// The sink is taken out on close, so every send after that fails fast
/// with [`Error::ViewerClosed`] instead of touching a dead transport.
pub struct Viewer<S> {
    id: ViewerId,
    sink: Arc<AsyncMutex<Option<S>>>,
}

impl<S> Viewer<S> {
    pub fn id(&self) -> ViewerId {
        self.id
    }
}

impl<S> Viewer<S>
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    /// Sends one message while holding this viewer's write lock.
    pub async fn send(&self, message: Message) -> Result<()> {
        let mut guard = self.sink.lock().await;
        send_to(self.id, &mut guard, message).await
    }

    /// Closes the transport. Returns `false` if it was already closed.
    pub async fn close(&self) -> bool {
        let mut guard = self.sink.lock().await;
        let Some(mut sink) = guard.take() else {
            return false;
        };
        if let Err(e) = sink.close().await {
            tracing::debug!(viewer = %self.id, error = %e, "Error while closing viewer");
        }
        true
    }
}

/// A viewer's write lock, held from the moment it is registered.
///
/// Broadcasts that already see the viewer queue behind this guard, so
/// whatever is sent through it reaches the viewer first.
pub struct ViewerWriter<S> {
    id: ViewerId,
    guard: OwnedMutexGuard<Option<S>>,
}

impl<S> ViewerWriter<S>
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    pub async fn send(&mut self, message: Message) -> Result<()> {
        send_to(self.id, &mut self.guard, message).await
    }
}

async fn send_to<S>(id: ViewerId, slot: &mut Option<S>, message: Message) -> Result<()>
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    let sink = slot.as_mut().ok_or(Error::ViewerClosed(id))?;
    sink.send(message).await.map_err(|e| Error::SendFailed {
        id,
        reason: e.to_string(),
    })
}

/// Thread-safe set of live viewers.
///
/// The map lock is only held to insert, remove or copy entries, never
/// across network I/O.
pub struct ViewerRegistry<S> {
    next_id: AtomicU64,
    viewers: Mutex<HashMap<ViewerId, Arc<Viewer<S>>>>,
}

impl<S> Default for ViewerRegistry<S> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            viewers: Mutex::new(HashMap::new()),
        }
    }
}

impl<S> ViewerRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection with a fresh write lock.
    ///
    /// The lock is taken before the viewer becomes visible to broadcasts
    /// and handed back still held. Drop the writer to let broadcasts in.
    pub async fn register(&self, sink: S) -> (Arc<Viewer<S>>, ViewerWriter<S>) {
        let id = ViewerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let slot = Arc::new(AsyncMutex::new(Some(sink)));
        let guard = Arc::clone(&slot).lock_owned().await;
        let viewer = Arc::new(Viewer { id, sink: slot });
        self.lock().insert(id, Arc::clone(&viewer));
        (viewer, ViewerWriter { id, guard })
    }

    /// Removes a viewer. Returns the entry only for the call that actually
    /// removed it; later calls are no-ops.
    pub fn unregister(&self, id: ViewerId) -> Option<Arc<Viewer<S>>> {
        self.lock().remove(&id)
    }

    /// Point-in-time copy of all live viewers.
    pub fn snapshot(&self) -> Vec<Arc<Viewer<S>>> {
        self.lock().values().cloned().collect()
    }

    /// Removes every viewer at once.
    pub fn drain(&self) -> Vec<Arc<Viewer<S>>> {
        self.lock().drain().map(|(_, viewer)| viewer).collect()
    }

    #[cfg(test)]
    pub fn contains(&self, id: ViewerId) -> bool {
        self.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ViewerId, Arc<Viewer<S>>>> {
        self.viewers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
