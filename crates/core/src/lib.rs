//! Domain logic for the room designer backend.
//!
//! Everything in this crate is pure: request and result types, the
//! deterministic style mapping, stream event payloads and the timing
//! defaults shared by the API server.

pub mod error;
pub mod generation;
pub mod session;
pub mod stream_events;
pub mod types;
