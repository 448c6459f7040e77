//! Generation engine.
//!
//! Contains the worker that turns generation requests into ordered event
//! sequences on a client's session stream.

pub mod generator;

pub use generator::GenerationWorker;
