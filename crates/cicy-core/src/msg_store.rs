//! Append-only text and image log shared by every protocol surface.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use thiserror::Error;

use crate::message::{ImageMessage, MessageId, TextMessage};

/// Store error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} identifier space exhausted")]
    IdExhausted(&'static str),
}

#[derive(Default)]
struct Inner {
    texts: Vec<TextMessage>,
    images: Vec<ImageMessage>,
}

/// Snapshot of how many entries each log holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreCounts {
    pub messages: usize,
    pub images: usize,
}

/// Message store guarded by a single readers-writer lock.
///
/// Ids are the 1-based position in their log, so they grow strictly
/// while the log is only appended to and start again at 1 after `clear`.
#[derive(Default)]
pub struct MessageStore {
    inner: RwLock<Inner>,
}

impl MessageStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation is a single push or clear, so a guard poisoned by a
    // panicking holder still protects a consistent log.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a text message and return its id.
    ///
    /// # Errors
    /// Returns [`StoreError::IdExhausted`] if no further id can be issued.
    pub fn append_text(&self, text: impl Into<String>) -> Result<MessageId, StoreError> {
        let mut inner = self.write();
        let id = next_id(inner.texts.len()).ok_or(StoreError::IdExhausted("message"))?;
        inner.texts.push(TextMessage {
            text: text.into(),
            timestamp: Utc::now(),
            id,
        });
        Ok(id)
    }

    /// Append an image whose bytes are already base64 encoded.
    ///
    /// # Errors
    /// Returns [`StoreError::IdExhausted`] if no further id can be issued.
    pub fn append_image(
        &self,
        encoded: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Result<MessageId, StoreError> {
        let mut inner = self.write();
        let id = next_id(inner.images.len()).ok_or(StoreError::IdExhausted("image"))?;
        inner.images.push(ImageMessage {
            name: format!("image_{id}"),
            mime_type: mime_type.into(),
            data: encoded.into(),
            timestamp: Utc::now(),
            id,
        });
        Ok(id)
    }

    /// All text messages in arrival order.
    #[must_use]
    pub fn list_text(&self) -> Vec<TextMessage> {
        self.read().texts.clone()
    }

    /// All images in arrival order.
    #[must_use]
    pub fn list_images(&self) -> Vec<ImageMessage> {
        self.read().images.clone()
    }

    /// Current entry counts, taken under one read lock.
    #[must_use]
    pub fn counts(&self) -> StoreCounts {
        let inner = self.read();
        StoreCounts {
            messages: inner.texts.len(),
            images: inner.images.len(),
        }
    }

    /// Empty both logs at once.
    pub fn clear(&self) {
        let mut inner = self.write();
        inner.texts.clear();
        inner.images.clear();
    }
}

fn next_id(len: usize) -> Option<MessageId> {
    MessageId::try_from(len).ok()?.checked_add(1)
}
