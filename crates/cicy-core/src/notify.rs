//! Single-subscriber, drop-on-pressure notification channel.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::message::Notification;

/// Inbox size of an attached receiver.
pub const DEFAULT_INBOX: usize = 64;

/// What happened to a published notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Queued in the attached receiver's inbox.
    Delivered,
    /// Nobody is attached.
    NoReceiver,
    /// The receiver's inbox is full.
    Full,
    /// The receiver was dropped; it has been detached.
    Closed,
}

/// Fan-out from ingestion paths to at most one interactive session.
///
/// `publish` never waits: if no receiver is attached or its inbox is
/// full, the notification is dropped.
pub struct NotificationChannel {
    sender: Mutex<Option<mpsc::Sender<Notification>>>,
    capacity: usize,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationChannel {
    /// Create a channel whose receivers hold [`DEFAULT_INBOX`] events.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INBOX)
    }

    /// Create a channel with a custom inbox size (at least 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sender: Mutex::new(None),
            capacity: capacity.max(1),
        }
    }

    /// Attach a new receiver, replacing any previous one.
    #[must_use]
    pub fn attach(&self) -> mpsc::Receiver<Notification> {
        let (tx, rx) = mpsc::channel(self.capacity);
        let previous = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(tx);
        if previous.is_some() {
            tracing::debug!("Replaced attached notification receiver");
        }
        rx
    }

    /// Detach the current receiver, if any.
    pub fn detach(&self) {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Whether a receiver is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    /// Offer a notification without blocking.
    pub fn publish(&self, notification: Notification) -> Delivery {
        let mut slot = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(tx) = slot.as_ref() else {
            return Delivery::NoReceiver;
        };
        match tx.try_send(notification) {
            Ok(()) => Delivery::Delivered,
            Err(TrySendError::Full(dropped)) => {
                tracing::debug!(?dropped, "Notification inbox full, dropping");
                Delivery::Full
            }
            Err(TrySendError::Closed(_)) => {
                slot.take();
                Delivery::Closed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_receiver_is_dropped() {
        let channel = NotificationChannel::new();
        assert!(!channel.is_attached());
        assert_eq!(
            channel.publish(Notification::text("lost")),
            Delivery::NoReceiver
        );
    }

    #[test]
    fn test_attached_receiver_gets_events_in_order() {
        let channel = NotificationChannel::new();
        let mut rx = channel.attach();

        channel.publish(Notification::text("first"));
        channel.publish(Notification::image("/tmp/a.png", "12 bytes"));

        assert_eq!(rx.try_recv().unwrap(), Notification::text("first"));
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::image("/tmp/a.png", "12 bytes")
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_full_inbox_drops_instead_of_blocking() {
        let channel = NotificationChannel::with_capacity(1);
        let mut rx = channel.attach();

        assert_eq!(channel.publish(Notification::text("a")), Delivery::Delivered);
        assert_eq!(channel.publish(Notification::text("b")), Delivery::Full);

        assert_eq!(rx.try_recv().unwrap(), Notification::text("a"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_attach_replaces_previous_receiver() {
        let channel = NotificationChannel::new();
        let mut old = channel.attach();
        let mut new = channel.attach();

        channel.publish(Notification::text("hello"));

        assert_eq!(new.try_recv().unwrap(), Notification::text("hello"));
        // The old sender was dropped, so the old receiver is closed and empty.
        assert!(matches!(
            old.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_dropped_receiver_is_detached() {
        let channel = NotificationChannel::new();
        drop(channel.attach());

        assert_eq!(channel.publish(Notification::text("x")), Delivery::Closed);
        assert_eq!(channel.publish(Notification::text("y")), Delivery::NoReceiver);
    }

    #[test]
    fn test_receiver_awaits_published_event() {
        let channel = NotificationChannel::new();
        let mut rx = channel.attach();
        channel.publish(Notification::text("async"));

        let received = tokio_test::block_on(rx.recv());
        assert_eq!(received, Some(Notification::text("async")));
    }
}
