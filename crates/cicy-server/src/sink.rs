//! Filesystem image sink.

use std::{io, path::PathBuf};

use async_trait::async_trait;
use chrono::Local;
use cicy_core::traits::{ImageSink, SinkError};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

/// Writes each image as a PNG file under one directory.
///
/// Ids restart after a clear, so an existing file is never replaced: the
/// name gets a numeric suffix instead.
#[derive(Debug, Clone)]
pub struct FsImageSink {
    dir: PathBuf,
}

impl FsImageSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

#[async_trait]
impl ImageSink for FsImageSink {
    async fn persist(&self, id: u64, bytes: &[u8]) -> Result<PathBuf, SinkError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let mut attempt = 0u32;
        loop {
            let name = match attempt {
                0 => format!("image_{stamp}_{id}.png"),
                n => format!("image_{stamp}_{id}_{n}.png"),
            };
            let path = self.dir.join(name);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(bytes).await?;
                    file.flush().await?;
                    tracing::debug!(path = %path.display(), size = bytes.len(), "Saved image");
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_persist_creates_directory_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = FsImageSink::new(tmp.path().join("nested/images"));

        let path = sink.persist(3, b"\x89PNG").await.unwrap();

        assert!(path.starts_with(sink.dir()));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("image_") && name.ends_with("_3.png"), "{name}");
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG");
    }

    #[tokio::test]
    async fn test_reused_id_does_not_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = FsImageSink::new(tmp.path());

        let first = sink.persist(1, b"before clear").await.unwrap();
        let second = sink.persist(1, b"after clear").await.unwrap();
        let third = sink.persist(1, b"again").await.unwrap();

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_eq!(std::fs::read(&first).unwrap(), b"before clear");
        assert_eq!(std::fs::read(&second).unwrap(), b"after clear");
        assert_eq!(std::fs::read(&third).unwrap(), b"again");
    }
}
