//! Collaborator traits for remote execution, host lookup and image handling.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Executor error.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Executable not found: {0}")]
    ExecutableNotFound(String),
    #[error("Spawn failed: {0}")]
    SpawnFailed(#[from] std::io::Error),
    #[error("{status}: {output}")]
    Failed { status: String, output: String },
    #[error("Command timed out after {0}s")]
    TimedOut(u64),
}

/// Runs a command on a named remote host.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Run `command` on `host` and return its combined output.
    async fn run(&self, host: &str, command: &str) -> Result<String, ExecutorError>;
}

/// Source of the remote hosts offered in host selection.
pub trait HostCatalog: Send + Sync {
    /// Host names in display order. An unreadable source yields none.
    fn hosts(&self) -> Vec<String>;
}

/// Fixed host list, mostly for tests and embedding.
impl HostCatalog for Vec<String> {
    fn hosts(&self) -> Vec<String> {
        self.clone()
    }
}

/// Image sink error.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persists ingested images so the interactive session can open them.
#[async_trait]
pub trait ImageSink: Send + Sync {
    /// Write `bytes` for image `id` and return where they were stored.
    async fn persist(&self, id: u64, bytes: &[u8]) -> Result<PathBuf, SinkError>;
}

/// Image viewer error.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Viewer not found: {0}")]
    NotFound(String),
    #[error("Viewer command is invalid: {0}")]
    InvalidCommand(String),
    #[error("Failed to launch viewer: {0}")]
    Launch(#[from] std::io::Error),
    #[error("Viewer exited with {0}")]
    Exit(std::process::ExitStatus),
}

/// Opens a persisted image for the user.
#[async_trait]
pub trait ImageViewer: Send + Sync {
    /// Open the image at `path`.
    async fn open(&self, path: &Path) -> Result<(), ViewerError>;
}
