use std::sync::atomic::{AtomicU8, Ordering};

use roomdesigner_core::session::{CloseReason, SessionState};
use roomdesigner_core::types::Timestamp;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::sse::StreamEvent;

/// Channel sender half for pushing events to a session stream.
pub type EventSender = mpsc::UnboundedSender<StreamEvent>;

/// Returned by [`Session::send`] when the event could not be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("session stream is closed")]
pub struct StreamClosed;

/// One client's streaming session.
///
/// The registry owns session identity; generation runs only check
/// liveness and write events.
pub struct Session {
    /// Process-unique id, distinguishes a session from a later one that
    /// reuses the same client id.
    id: u64,
    client_id: String,
    sender: EventSender,
    state: AtomicU8,
    closed: CancellationToken,
    connected_at: Timestamp,
}

impl Session {
    pub(crate) fn new(id: u64, client_id: String, sender: EventSender) -> Self {
        Self {
            id,
            client_id,
            sender,
            state: AtomicU8::new(SessionState::Open as u8),
            closed: CancellationToken::new(),
            connected_at: chrono::Utc::now(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether events may still be written.
    pub fn is_live(&self) -> bool {
        self.state().is_live()
    }

    /// Write an event to the stream.
    ///
    /// Fails if the session is no longer live or the stream's receiver has
    /// gone away. Callers treat any failure as terminal for the session.
    pub fn send(&self, event: StreamEvent) -> Result<(), StreamClosed> {
        if !self.is_live() {
            return Err(StreamClosed);
        }
        self.sender.send(event).map_err(|_| StreamClosed)
    }

    /// Resolves once the session has left the `Open` state.
    pub async fn closed(&self) {
        self.closed.cancelled().await;
    }

    pub(crate) fn closed_token(&self) -> CancellationToken {
        self.closed.clone()
    }

    /// Move `Open -> Closing -> Closed` and finalize the stream.
    ///
    /// Returns `true` only for the call that performed the transition;
    /// every later call is a no-op.
    pub(crate) fn close(&self, reason: CloseReason) -> bool {
        if self
            .state
            .compare_exchange(
                SessionState::Open as u8,
                SessionState::Closing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return false;
        }

        self.closed.cancel();
        self.state
            .store(SessionState::Closed as u8, Ordering::Release);

        let open_ms = (chrono::Utc::now() - self.connected_at).num_milliseconds();
        tracing::info!(
            client_id = %self.client_id,
            session_id = self.id,
            %reason,
            open_ms,
            "Session closed",
        );
        true
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("client_id", &self.client_id)
            .field("state", &self.state())
            .field("connected_at", &self.connected_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (Session, mpsc::UnboundedReceiver<StreamEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Session::new(1, "client-1".into(), tx), rx)
    }

    #[test]
    fn new_session_is_open() {
        let (session, _rx) = session();
        assert_eq!(session.state(), SessionState::Open);
        assert!(session.is_live());
    }

    #[test]
    fn close_transitions_once() {
        let (session, _rx) = session();

        assert!(session.close(CloseReason::Explicit));
        assert_eq!(session.state(), SessionState::Closed);
        assert!(!session.close(CloseReason::StreamError));
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn send_after_close_fails() {
        let (session, mut rx) = session();
        session.close(CloseReason::Explicit);

        assert_eq!(session.send(StreamEvent::Connect), Err(StreamClosed));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn send_to_dropped_receiver_fails_without_panic() {
        let (session, rx) = session();
        drop(rx);

        assert_eq!(session.send(StreamEvent::Connect), Err(StreamClosed));
    }

    #[tokio::test]
    async fn closed_resolves_after_close() {
        let (session, _rx) = session();
        session.close(CloseReason::Timeout);
        session.closed().await;
    }
}
