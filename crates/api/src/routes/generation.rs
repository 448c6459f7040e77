use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Mount session and generation routes (nested under `/generate`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/connect", get(generation::connect))
        .route("/connect/{client_id}", get(generation::connect_with_id))
        .route("/image/{client_id}", post(generation::generate_image))
        .route("/close/{client_id}", delete(generation::close_connection))
}
