use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use roomdesigner_core::session::CloseReason;
use tokio::sync::mpsc;
use tokio::time::Sleep;
use tokio_util::sync::WaitForCancellationFutureOwned;

use crate::sse::{Session, SessionRegistry, StreamEvent};

/// Receiving end of a session, used as the body of an SSE response.
///
/// Ends when the session closes or its timeout elapses. Dropping the
/// stream (the client disconnected) closes the session and removes it from
/// the registry.
pub struct SessionStream {
    session: Arc<Session>,
    receiver: mpsc::UnboundedReceiver<StreamEvent>,
    closed: Pin<Box<WaitForCancellationFutureOwned>>,
    deadline: Pin<Box<Sleep>>,
    registry: Weak<SessionRegistry>,
    finished: bool,
}

impl SessionStream {
    pub(crate) fn new(
        session: Arc<Session>,
        receiver: mpsc::UnboundedReceiver<StreamEvent>,
        registry: Weak<SessionRegistry>,
        timeout: Duration,
    ) -> Self {
        let closed = Box::pin(session.closed_token().cancelled_owned());
        Self {
            session,
            receiver,
            closed,
            deadline: Box::pin(tokio::time::sleep(timeout)),
            registry,
            finished: false,
        }
    }

    /// Client id of the underlying session.
    pub fn client_id(&self) -> &str {
        self.session.client_id()
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }
}

impl Stream for SessionStream {
    type Item = StreamEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<StreamEvent>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        if this.closed.as_mut().poll(cx).is_ready() {
            this.finished = true;
            return Poll::Ready(None);
        }

        if this.deadline.as_mut().poll(cx).is_ready() {
            this.session.close(CloseReason::Timeout);
            this.finished = true;
            return Poll::Ready(None);
        }

        // The session holds the sender, so the channel never reports
        // `None` while this stream exists.
        this.receiver.poll_recv(cx)
    }
}

impl Drop for SessionStream {
    fn drop(&mut self) {
        self.session.close(CloseReason::Disconnected);
        if let Some(registry) = self.registry.upgrade() {
            registry.forget_later(Arc::clone(&self.session));
        }
    }
}
