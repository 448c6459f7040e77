use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::GenerationWorker;
use crate::sse::SessionRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live SSE sessions keyed by client id.
    pub sessions: Arc<SessionRegistry>,
    /// Background generation runs.
    pub generator: Arc<GenerationWorker>,
}

impl AppState {
    /// Build the registry and worker described by `config`.
    pub fn new(config: ServerConfig) -> Self {
        let sessions = Arc::new(SessionRegistry::new(config.session_timeout()));
        let generator = Arc::new(GenerationWorker::new(
            Arc::clone(&sessions),
            config.timing,
            config.max_concurrent_generations,
        ));
        Self {
            config: Arc::new(config),
            sessions,
            generator,
        }
    }
}
