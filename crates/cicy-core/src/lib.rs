//! Core building blocks of the cicy message relay.
//!
//! This crate provides:
//! - `MessageStore` - Concurrent append-only text and image log
//! - `NotificationChannel` - Non-blocking push to one live session
//! - Message and notification types
//! - Collaborator traits for remote execution, host lookup and images

pub mod format;
pub mod message;
pub mod msg_store;
pub mod notify;
pub mod traits;

pub use format::format_size;
pub use message::{IMAGE_MIME_TYPE, ImageMessage, MessageId, Notification, TextMessage};
pub use msg_store::{MessageStore, StoreCounts, StoreError};
pub use notify::{Delivery, NotificationChannel};
pub use traits::{HostCatalog, ImageSink, ImageViewer, RemoteExecutor};
