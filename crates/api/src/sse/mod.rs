//! Server-sent event sessions.
//!
//! Provides the per-client session registry, the session handle written to
//! by generation runs, and the stream that backs each SSE response.

mod event;
pub mod registry;
mod session;
mod stream;

pub use event::StreamEvent;
pub use registry::SessionRegistry;
pub use session::{Session, StreamClosed};
pub use stream::SessionStream;
