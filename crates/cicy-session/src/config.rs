//! Session configuration.

use std::time::Duration;

/// Settings of the interactive client.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the protocol server, `None` when it is not running.
    pub server_url: Option<String>,
    /// Ceiling for one submit request.
    pub request_timeout: Duration,
    /// Ceiling for one remote command.
    pub remote_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            request_timeout: Duration::from_secs(30),
            remote_timeout: Duration::from_secs(120),
        }
    }
}

impl SessionConfig {
    /// Config for a server listening on local `port`.
    #[must_use]
    pub fn local(port: u16) -> Self {
        Self {
            server_url: Some(format!("http://127.0.0.1:{port}")),
            ..Self::default()
        }
    }
}
