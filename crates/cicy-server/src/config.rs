//! Server configuration.

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 13001;

/// Default request body ceiling; inline images arrive base64 encoded.
pub const DEFAULT_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address {0}")]
    InvalidAddress(String),
}

/// Everything the protocol server needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// File holding the ingestion token.
    pub token_file: PathBuf,
    /// Directory ingested images are written to.
    pub image_dir: PathBuf,
    /// Ceiling for downloading an image URL.
    pub fetch_timeout: Duration,
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            token_file: home.join("data").join("cicy-server.txt"),
            image_dir: home.join("Desktop").join("images"),
            fetch_timeout: Duration::from_secs(30),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Socket address to bind.
    ///
    /// # Errors
    /// Returns error if `host` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}
