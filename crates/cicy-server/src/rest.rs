//! Plain REST endpoints: submit, list and health.

use axum::{Json, extract::State};
use bytes::Bytes;
use cicy_core::{Notification, TextMessage};
use serde_json::Value;
use tracing::info;

use crate::{
    AppState,
    error::ApiError,
    protocol::{HealthResponse, PROTOCOL_VERSION, SubmitRequest, SubmitResponse},
    replies,
};

/// `POST /message`: store a message and answer with a canned reply.
///
/// The body is read as JSON whatever its content type. A missing, empty or
/// non-string message is a structured failure, not an HTTP error.
///
/// # Errors
/// Returns 400 if the body is not JSON, 500 if the store is out of
/// identifiers.
pub async fn submit_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, ApiError> {
    let body: Value =
        serde_json::from_slice(&body).map_err(|_| ApiError::BadRequest("Invalid JSON"))?;
    let request = SubmitRequest::from_json(&body);
    let Some(text) = request.message.filter(|m| !m.is_empty()) else {
        return Ok(Json(SubmitResponse::failure("No message provided")));
    };

    let id = state.store.append_text(text.as_str())?;
    info!(id, %text, "Received message");
    state.notifier.publish(Notification::text(text));

    Ok(Json(SubmitResponse::ok(replies::random_reply())))
}

/// `GET /messages`: the full text log in arrival order.
pub async fn list_messages(State(state): State<AppState>) -> Json<Vec<TextMessage>> {
    Json(state.store.list_text())
}

/// `GET /health`: liveness plus current counts.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let counts = state.store.counts();
    Json(HealthResponse {
        status: "ok".to_string(),
        protocol: "mcp".to_string(),
        version: PROTOCOL_VERSION.to_string(),
        messages: counts.messages,
        images: counts.images,
    })
}
