//! Bearer token authentication for the ingestion endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::AppState;

/// Alternative header carrying the raw token.
pub const TOKEN_HEADER: &str = "x-auth-token";

/// The process-wide static token.
#[derive(Clone)]
pub struct AuthToken {
    bytes: Arc<[u8]>,
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken").finish_non_exhaustive()
    }
}

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            bytes: token.into().into_bytes().into(),
        }
    }

    /// Constant-time comparison. An empty token never matches.
    #[must_use]
    pub fn verify(&self, provided: &[u8]) -> bool {
        if provided.is_empty() || self.bytes.len() != provided.len() {
            return false;
        }
        let mut diff: u8 = 0;
        for (a, b) in self.bytes.iter().zip(provided) {
            diff |= a ^ b;
        }
        diff == 0
    }
}

/// Token from `Authorization` (with or without a `Bearer ` prefix),
/// falling back to `X-Auth-Token`.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers
        .get(AUTHORIZATION)
        .or_else(|| headers.get(TOKEN_HEADER))?
        .to_str()
        .ok()?;
    Some(raw.strip_prefix("Bearer ").unwrap_or(raw))
}

/// Reject requests without the static token.
pub async fn require_token(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let verdict = extract_token(request.headers()).map(|token| state.token.verify(token.as_bytes()));
    match verdict {
        Some(true) => next.run(request).await,
        Some(false) => {
            warn!(path = %request.uri().path(), "Invalid auth token");
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
        None => {
            warn!(path = %request.uri().path(), "Missing auth token");
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}
