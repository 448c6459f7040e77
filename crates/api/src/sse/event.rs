use axum::response::sse::Event;
use roomdesigner_core::stream_events::{
    CompletePayload, ProgressPayload, ThinkingPayload, CONNECT_ACK, EVENT_COMPLETE, EVENT_CONNECT,
    EVENT_PROGRESS, EVENT_THINKING,
};

/// A named event pushed into a session stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Connect,
    Thinking(ThinkingPayload),
    Progress(ProgressPayload),
    Complete(CompletePayload),
}

impl StreamEvent {
    /// SSE event name (`event:` field).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connect => EVENT_CONNECT,
            Self::Thinking(_) => EVENT_THINKING,
            Self::Progress(_) => EVENT_PROGRESS,
            Self::Complete(_) => EVENT_COMPLETE,
        }
    }

    /// Render as an axum SSE event. `CONNECT` carries plain text, every
    /// other event carries JSON.
    pub fn to_sse(&self) -> Result<Event, axum::Error> {
        let event = Event::default().event(self.name());
        match self {
            Self::Connect => Ok(event.data(CONNECT_ACK)),
            Self::Thinking(payload) => event.json_data(payload),
            Self::Progress(payload) => event.json_data(payload),
            Self::Complete(payload) => event.json_data(payload),
        }
    }
}
