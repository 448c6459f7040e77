//! Handlers for streaming sessions and mocked generation.
//!
//! Routes:
//! - `GET    /generate/connect`              — open a session with a generated id
//! - `GET    /generate/connect/{client_id}`  — open a session with the caller's id
//! - `POST   /generate/image/{client_id}`    — start a generation run
//! - `DELETE /generate/close/{client_id}`    — close a session

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::sse::{KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::StreamExt;
use roomdesigner_core::generation::GenerationRequest;
use roomdesigner_core::session::validate_client_id;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response header carrying the session's client id.
pub const CLIENT_ID_HEADER: HeaderName = HeaderName::from_static("x-client-id");

/// GET /api/generate/connect
///
/// Opens a session under a fresh UUID. The id is returned in the
/// `x-client-id` header so the caller can address later requests.
pub async fn connect(State(state): State<AppState>) -> Response {
    let client_id = uuid::Uuid::new_v4().to_string();
    session_response(&state, client_id).await
}

/// GET /api/generate/connect/{client_id}
pub async fn connect_with_id(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> AppResult<Response> {
    validate_client_id(&client_id)?;
    Ok(session_response(&state, client_id).await)
}

/// POST /api/generate/image/{client_id}
///
/// Always answers 200 once the body parses. A missing or closed session
/// is only visible in the server logs.
pub async fn generate_image(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> AppResult<StatusCode> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    state.generator.submit(&client_id, request).await;
    Ok(StatusCode::OK)
}

/// DELETE /api/generate/close/{client_id}
pub async fn close_connection(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> StatusCode {
    state.sessions.close(&client_id).await;
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Register a session and wrap its stream in an SSE response.
async fn session_response(state: &AppState, client_id: String) -> Response {
    let header_value = HeaderValue::from_str(&client_id).ok();
    let log_id = client_id.clone();

    let events = state.sessions.open(client_id).await.map(move |event| {
        event.to_sse().inspect_err(|e| {
            tracing::error!(client_id = %log_id, error = %e, "Failed to encode SSE event");
        })
    });

    let keep_alive = KeepAlive::new().interval(state.config.keep_alive());
    let mut response = Sse::new(events).keep_alive(keep_alive).into_response();

    if let Some(value) = header_value {
        response.headers_mut().insert(CLIENT_ID_HEADER, value);
    }
    response
}
