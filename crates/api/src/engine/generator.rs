//! Mocked generation runs.
//!
//! Each accepted request becomes one background task that pushes
//! `THINKING`, nine `PROGRESS` updates and a final `COMPLETE` into the
//! client's session. Liveness is checked before every write; a closed
//! session stops the run silently. No retry is performed on failure.

use std::sync::Arc;
use std::time::Duration;

use roomdesigner_core::generation::{self, GenerationRequest, GenerationResult};
use roomdesigner_core::session::CloseReason;
use roomdesigner_core::stream_events::{
    progress_steps, CompletePayload, ProgressPayload, ThinkingPayload,
};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::GenerationTiming;
use crate::sse::{Session, SessionRegistry, StreamClosed, StreamEvent};

/// Runs generation requests on a bounded pool of Tokio tasks.
pub struct GenerationWorker {
    sessions: Arc<SessionRegistry>,
    timing: GenerationTiming,
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl GenerationWorker {
    /// Create a worker allowing at most `max_concurrent` runs at once.
    pub fn new(
        sessions: Arc<SessionRegistry>,
        timing: GenerationTiming,
        max_concurrent: usize,
    ) -> Self {
        Self {
            sessions,
            timing,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Start a run for `client_id` without waiting for it.
    ///
    /// Returns `false` when no live session exists; the request is then
    /// dropped and nothing is emitted.
    pub async fn submit(&self, client_id: &str, request: GenerationRequest) -> bool {
        let Some(session) = self.sessions.get(client_id).await else {
            tracing::warn!(client_id, "Session missing or closed, generation request dropped");
            return false;
        };

        let run = GenerationRun {
            sessions: Arc::clone(&self.sessions),
            session,
            request,
            timing: self.timing,
            shutdown: self.shutdown.clone(),
        };
        let permits = Arc::clone(&self.permits);

        self.tracker.spawn(async move {
            // The semaphore is closed on shutdown.
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            run.execute().await;
        });

        tracing::debug!(client_id, "Generation run scheduled");
        true
    }

    /// Number of runs that have been spawned and not yet finished.
    pub fn active_runs(&self) -> usize {
        self.tracker.len()
    }

    /// Interrupt in-flight runs and wait up to `grace` for them to exit.
    pub async fn shutdown(&self, grace: Duration) {
        self.shutdown.cancel();
        self.permits.close();
        self.tracker.close();

        let pending = self.tracker.len();
        if tokio::time::timeout(grace, self.tracker.wait()).await.is_err() {
            tracing::warn!(pending, "Generation runs still active after shutdown grace period");
        } else {
            tracing::info!(pending, "Generation worker stopped");
        }
    }
}

// ---------------------------------------------------------------------------
// A single run
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Stream(#[from] StreamClosed),

    #[error("generation interrupted by shutdown")]
    Interrupted,
}

enum RunOutcome {
    Completed,
    Abandoned,
}

struct GenerationRun {
    sessions: Arc<SessionRegistry>,
    session: Arc<Session>,
    request: GenerationRequest,
    timing: GenerationTiming,
    shutdown: CancellationToken,
}

impl GenerationRun {
    async fn execute(self) {
        let result = generation::mock_generation(&self.request);
        let client_id = self.session.client_id();

        match self.emit(&result).await {
            Ok(RunOutcome::Completed) => {
                tracing::info!(client_id, image_url = %result.image_url, "Generation completed, result sent");
            }
            Ok(RunOutcome::Abandoned) => {
                tracing::debug!(client_id, "Session closed, generation abandoned");
            }
            Err(RunError::Stream(e)) => {
                tracing::error!(client_id, error = %e, "Failed to send SSE event");
                self.sessions
                    .release(&self.session, CloseReason::StreamError)
                    .await;
            }
            Err(RunError::Interrupted) => {
                tracing::error!(client_id, "Generation interrupted");
                self.sessions
                    .release(&self.session, CloseReason::Shutdown)
                    .await;
            }
        }
    }

    async fn emit(&self, result: &GenerationResult) -> Result<RunOutcome, RunError> {
        if !self.session.is_live() {
            return Ok(RunOutcome::Abandoned);
        }
        self.session.send(StreamEvent::Thinking(ThinkingPayload::new(
            &self.request,
            result,
        )))?;

        if !self.pause(self.timing.thinking_pause).await? {
            return Ok(RunOutcome::Abandoned);
        }

        for progress in progress_steps() {
            if !self.session.is_live() {
                return Ok(RunOutcome::Abandoned);
            }
            self.session
                .send(StreamEvent::Progress(ProgressPayload::new(progress)))?;
            tracing::debug!(client_id = self.session.client_id(), progress, "Progress sent");

            if !self.pause(self.timing.progress_interval).await? {
                return Ok(RunOutcome::Abandoned);
            }
        }

        if !self.pause(self.timing.final_pause).await? || !self.session.is_live() {
            return Ok(RunOutcome::Abandoned);
        }

        let timestamp = chrono::Utc::now().timestamp_millis();
        self.session
            .send(StreamEvent::Complete(CompletePayload::new(result, timestamp)))?;
        Ok(RunOutcome::Completed)
    }

    /// Simulated latency. `Ok(false)` means the session closed meanwhile.
    async fn pause(&self, duration: Duration) -> Result<bool, RunError> {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(RunError::Interrupted),
            _ = self.session.closed() => Ok(false),
            _ = tokio::time::sleep(duration) => Ok(true),
        }
    }
}
