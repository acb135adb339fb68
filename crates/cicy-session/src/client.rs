//! HTTP client for the server's submit endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Submit request error.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server rejected message: {0}")]
    Rejected(String),
    #[error("malformed server response")]
    Malformed,
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct SubmitReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Posts user input to `POST /message`.
#[derive(Debug, Clone)]
pub struct MessageClient {
    client: reqwest::Client,
    base_url: String,
}

impl MessageClient {
    /// Client for the server at `base_url`, giving up after `timeout`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Send `text` and return the server's reply.
    ///
    /// # Errors
    /// Returns error on transport failure, a non-2xx status, a failure
    /// body, or a body without a reply.
    pub async fn submit(&self, text: &str) -> Result<String, ClientError> {
        let reply: SubmitReply = self
            .client
            .post(format!("{}/message", self.base_url))
            .json(&SubmitBody { message: text })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !reply.success {
            return Err(ClientError::Rejected(
                reply.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        reply.message.ok_or(ClientError::Malformed)
    }
}
