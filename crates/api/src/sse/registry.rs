use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use roomdesigner_core::session::{CloseReason, DEFAULT_SESSION_TIMEOUT_SECS};
use tokio::sync::{mpsc, RwLock};

use crate::sse::{Session, SessionStream, StreamEvent};

/// Tracks all live streaming sessions, keyed by client id.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. At most one session per client id is
/// registered at a time.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    next_id: AtomicU64,
    session_timeout: Duration,
}

impl SessionRegistry {
    /// Create an empty registry whose streams end after `session_timeout`.
    pub fn new(session_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            session_timeout,
        }
    }

    /// Open a session for `client_id` and return its event stream.
    ///
    /// An existing session for the same id is closed and replaced. The
    /// returned stream always starts with a `CONNECT` event; if that write
    /// fails the session is closed straight away.
    pub async fn open(self: &Arc<Self>, client_id: impl Into<String>) -> SessionStream {
        let client_id = client_id.into();
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Arc::new(Session::new(
            self.next_id.fetch_add(1, Ordering::Relaxed),
            client_id.clone(),
            tx,
        ));

        let previous = self
            .sessions
            .write()
            .await
            .insert(client_id.clone(), Arc::clone(&session));
        if let Some(previous) = previous {
            previous.close(CloseReason::Replaced);
        }

        let stream = SessionStream::new(
            Arc::clone(&session),
            rx,
            Arc::downgrade(self),
            self.session_timeout,
        );

        if session.send(StreamEvent::Connect).is_err() {
            tracing::warn!(client_id = %client_id, "Failed to send CONNECT, closing session");
            self.release(&session, CloseReason::StreamError).await;
        } else {
            tracing::info!(client_id = %client_id, session_id = session.id(), "Session opened");
        }

        stream
    }

    /// Close the session for `client_id`.
    ///
    /// Idempotent: unknown or already-closed ids are a no-op. Returns
    /// `true` if a live session was closed by this call.
    pub async fn close(&self, client_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(client_id);
        match removed {
            Some(session) => session.close(CloseReason::Explicit),
            None => {
                tracing::debug!(client_id, "Close requested for unknown session");
                false
            }
        }
    }

    /// Whether a live session is registered for `client_id`.
    pub async fn is_active(&self, client_id: &str) -> bool {
        self.sessions
            .read()
            .await
            .get(client_id)
            .is_some_and(|session| session.is_live())
    }

    /// Look up the live session for `client_id`.
    pub async fn get(&self, client_id: &str) -> Option<Arc<Session>> {
        self.sessions
            .read()
            .await
            .get(client_id)
            .filter(|session| session.is_live())
            .cloned()
    }

    /// Close `session` and deregister it, unless a newer session has
    /// already taken its client id.
    pub async fn release(&self, session: &Arc<Session>, reason: CloseReason) {
        session.close(reason);
        self.forget(session).await;
    }

    /// Return the current number of live sessions.
    pub async fn connection_count(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|session| session.is_live())
            .count()
    }

    /// Close every session and clear the map.
    ///
    /// Used during graceful shutdown.
    pub async fn shutdown_all(&self) {
        let mut sessions = self.sessions.write().await;
        let count = sessions.len();
        for (_, session) in sessions.drain() {
            session.close(CloseReason::Shutdown);
        }
        tracing::info!(count, "Closed all sessions");
    }

    async fn forget(&self, session: &Arc<Session>) -> bool {
        let mut sessions = self.sessions.write().await;
        remove_if_current(&mut sessions, session)
    }

    /// Deregister `session` from a synchronous context (stream drop).
    pub(crate) fn forget_later(self: Arc<Self>, session: Arc<Session>) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    self.forget(&session).await;
                });
            }
            Err(_) => {
                if let Ok(mut sessions) = self.sessions.try_write() {
                    remove_if_current(&mut sessions, &session);
                }
            }
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_SESSION_TIMEOUT_SECS))
    }
}

/// Remove the entry for `session.client_id()` only if it is `session`.
fn remove_if_current(sessions: &mut HashMap<String, Arc<Session>>, session: &Arc<Session>) -> bool {
    let is_current = sessions
        .get(session.client_id())
        .is_some_and(|registered| Arc::ptr_eq(registered, session));
    if is_current {
        sessions.remove(session.client_id());
    }
    is_current
}
