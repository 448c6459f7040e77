pub mod generation;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /generate/connect                     open session, generated id (SSE)
/// /generate/connect/{client_id}         open session, caller id (SSE)
/// /generate/image/{client_id}           start generation (POST)
/// /generate/close/{client_id}           close session (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/generate", generation::router())
}
