//! Stored message types and live notifications.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a stored text message or image, starting at 1.
pub type MessageId = u64;

/// The only image type the relay accepts.
pub const IMAGE_MIME_TYPE: &str = "image/png";

/// A text message as stored and as returned by `GET /messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "text")]
pub struct TextMessage {
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub id: MessageId,
}

/// A stored image. `data` holds the base64 encoding of the image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "image", rename_all = "camelCase")]
pub struct ImageMessage {
    pub name: String,
    pub mime_type: String,
    pub data: String,
    pub timestamp: DateTime<Utc>,
    pub id: MessageId,
}

/// Event pushed to the attached interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A producer delivered a text message.
    NewText { text: String },
    /// A producer delivered an image, already persisted at `path`.
    NewImage { path: PathBuf, size_label: String },
}

impl Notification {
    /// Text notification.
    pub fn text(text: impl Into<String>) -> Self {
        Self::NewText { text: text.into() }
    }

    /// Image notification.
    pub fn image(path: impl Into<PathBuf>, size_label: impl Into<String>) -> Self {
        Self::NewImage {
            path: path.into(),
            size_label: size_label.into(),
        }
    }
}
