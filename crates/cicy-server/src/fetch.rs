//! Download of images referenced by URL.

use std::time::Duration;

use thiserror::Error;

use crate::config::DEFAULT_BODY_LIMIT;

/// Image download error.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("empty response body")]
    Empty,
    #[error("image larger than {limit} bytes")]
    TooLarge { limit: usize },
}

/// HTTP client used for image URLs.
#[derive(Clone, Debug)]
pub struct ImageFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl ImageFetcher {
    /// Create a fetcher whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            max_bytes: DEFAULT_BODY_LIMIT,
        })
    }

    /// Cap the size of a downloaded image.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Download `url` and return its body.
    ///
    /// # Errors
    /// Returns error on transport failure, a non-2xx status, an empty body
    /// or a body over the size cap.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let limit = self.max_bytes;
        let mut response = self.client.get(url).send().await?.error_for_status()?;
        if response
            .content_length()
            .is_some_and(|len| len > limit as u64)
        {
            return Err(FetchError::TooLarge { limit });
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > limit {
                return Err(FetchError::TooLarge { limit });
            }
            bytes.extend_from_slice(&chunk);
        }
        if bytes.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::get};

    use super::*;

    async fn serve_image(body: &'static [u8]) -> String {
        let app = Router::new().route("/img.png", get(move || async move { body }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}/img.png")
    }

    #[tokio::test]
    async fn test_fetch_within_limit() {
        let url = serve_image(b"\x89PNG").await;
        let fetcher = ImageFetcher::new(Duration::from_secs(5))
            .unwrap()
            .with_max_bytes(4);
        assert_eq!(fetcher.fetch(&url).await.unwrap(), b"\x89PNG");
    }

    #[tokio::test]
    async fn test_fetch_over_limit_is_refused() {
        let url = serve_image(b"0123456789").await;
        let fetcher = ImageFetcher::new(Duration::from_secs(5))
            .unwrap()
            .with_max_bytes(8);
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::TooLarge { limit: 8 }), "{err}");
    }
}
