//! Loading and generating the static ingestion token.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use rand::RngCore;
use thiserror::Error;
use tracing::{info, warn};

/// Token file error.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A fresh random token: 32 bytes, URL-safe base64.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE.encode(bytes)
}

/// Read the token stored at `path`, or generate and store a new one.
///
/// Storing is best effort: on failure the generated token is still
/// returned and used for this process.
pub fn load_or_generate(path: &Path) -> String {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let existing = existing.trim();
        if !existing.is_empty() {
            info!(path = %path.display(), "Loaded auth token");
            return existing.to_string();
        }
    }

    let token = generate_token();
    match persist(path, &token) {
        Ok(()) => info!(path = %path.display(), "Generated new auth token"),
        Err(e) => warn!(error = %e, "Auth token not saved"),
    }
    token
}

fn persist(path: &Path, token: &str) -> Result<(), TokenError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| TokenError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options
        .open(path)
        .and_then(|mut file| file.write_all(token.as_bytes()))
        .map_err(|source| TokenError::Write {
            path: path.to_path_buf(),
            source,
        })
}
