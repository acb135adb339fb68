//! REST error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cicy_core::{StoreError, traits::SinkError};
use thiserror::Error;

use crate::fetch::FetchError;

/// Failure of a REST request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("Failed to download image: {0}")]
    Fetch(#[from] FetchError),
    #[error("Failed to save image: {0}")]
    Persist(#[from] SinkError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Fetch(_) => StatusCode::BAD_REQUEST,
            Self::Persist(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::BadRequest(msg) => (*msg).to_string(),
            Self::Fetch(_) => "Failed to download image".to_string(),
            Self::Persist(_) => "Failed to save image".to_string(),
            Self::Store(_) => "Internal error".to_string(),
        };
        tracing::warn!(error = %self, "Request failed");
        (self.status(), body).into_response()
    }
}
