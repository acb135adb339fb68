//! Runs session effects in the background.

use std::{ops::ControlFlow, sync::Arc, time::Duration};

use cicy_core::{HostCatalog, ImageViewer, RemoteExecutor};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    client::MessageClient,
    event::{Effect, SessionEvent},
};

/// Period of the pending-indicator animation.
pub const TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Turns effects into tasks whose results come back as events.
///
/// Only the owning loop holds the receiver; tasks hold a sender clone,
/// so a finished request cannot block the loop.
#[derive(Clone)]
pub struct Driver {
    client: Option<MessageClient>,
    executor: Arc<dyn RemoteExecutor>,
    viewer: Arc<dyn ImageViewer>,
    hosts: Arc<dyn HostCatalog>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl Driver {
    /// Create a driver and the receiver its completions arrive on.
    ///
    /// `client` is `None` when no server is running.
    #[must_use]
    pub fn new(
        client: Option<MessageClient>,
        executor: Arc<dyn RemoteExecutor>,
        viewer: Arc<dyn ImageViewer>,
        hosts: Arc<dyn HostCatalog>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Self {
                client,
                executor,
                viewer,
                hosts,
                events,
            },
            rx,
        )
    }

    /// Sender for feeding other event sources into the same loop.
    #[must_use]
    pub fn sender(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.events.clone()
    }

    /// Start `effect`. Returns `Break` when the session should end.
    pub fn run(&self, effect: Effect) -> ControlFlow<()> {
        match effect {
            Effect::Exit => return ControlFlow::Break(()),
            Effect::Submit { text } => {
                let client = self.client.clone();
                let events = self.events.clone();
                tokio::spawn(async move {
                    let text = match client {
                        Some(client) => client
                            .submit(&text)
                            .await
                            .unwrap_or_else(|e| format!("Error: {e}")),
                        None => "Error: server is not running".to_string(),
                    };
                    let _ = events.send(SessionEvent::Completed { text });
                });
            }
            Effect::RunRemote { host, command } => {
                let executor = Arc::clone(&self.executor);
                let events = self.events.clone();
                tokio::spawn(async move {
                    debug!(%host, %command, "Forwarding command");
                    let text = executor
                        .run(&host, &command)
                        .await
                        .unwrap_or_else(|e| format!("Error: {e}"));
                    let _ = events.send(SessionEvent::Completed { text });
                });
            }
            Effect::ListHosts => {
                let catalog = Arc::clone(&self.hosts);
                let events = self.events.clone();
                tokio::spawn(async move {
                    // Catalogs may read files.
                    let hosts = tokio::task::spawn_blocking(move || catalog.hosts())
                        .await
                        .unwrap_or_else(|e| {
                            warn!(error = %e, "Host lookup failed");
                            Vec::new()
                        });
                    let _ = events.send(SessionEvent::HostsListed(hosts));
                });
            }
            Effect::OpenImage(path) => {
                let viewer = Arc::clone(&self.viewer);
                tokio::spawn(async move {
                    if let Err(e) = viewer.open(&path).await {
                        warn!(path = %path.display(), error = %e, "Failed to open image");
                    }
                });
            }
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        path::{Path, PathBuf},
        sync::Mutex,
    };

    use async_trait::async_trait;
    use cicy_core::traits::{ExecutorError, ViewerError};

    use super::*;

    struct EchoExecutor;

    #[async_trait]
    impl RemoteExecutor for EchoExecutor {
        async fn run(&self, host: &str, command: &str) -> Result<String, ExecutorError> {
            if command == "fail" {
                return Err(ExecutorError::Failed {
                    status: "exit status: 1".into(),
                    output: "boom".into(),
                });
            }
            Ok(format!("{host}: {command}\nline two"))
        }
    }

    #[derive(Default)]
    struct RecordingViewer {
        opened: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl ImageViewer for RecordingViewer {
        async fn open(&self, path: &Path) -> Result<(), ViewerError> {
            self.opened.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    fn driver() -> (Driver, mpsc::UnboundedReceiver<SessionEvent>, Arc<RecordingViewer>) {
        let viewer = Arc::new(RecordingViewer::default());
        let hosts = Arc::new(vec!["web1".to_string(), "db".to_string()]);
        let (driver, rx) = Driver::new(None, Arc::new(EchoExecutor), viewer.clone(), hosts);
        (driver, rx, viewer)
    }

    #[tokio::test]
    async fn test_remote_result_comes_back_as_event() {
        let (driver, mut rx, _) = driver();
        let flow = driver.run(Effect::RunRemote {
            host: "web1".into(),
            command: "uptime".into(),
        });
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(
            rx.recv().await.unwrap(),
            SessionEvent::Completed { text: "web1: uptime\nline two".into() }
        );
    }

    #[tokio::test]
    async fn test_failures_become_error_text() {
        let (driver, mut rx, _) = driver();
        driver.run(Effect::RunRemote {
            host: "web1".into(),
            command: "fail".into(),
        });
        assert_eq!(
            rx.recv().await.unwrap(),
            SessionEvent::Completed { text: "Error: exit status: 1: boom".into() }
        );

        driver.run(Effect::Submit { text: "hi".into() });
        let SessionEvent::Completed { text } = rx.recv().await.unwrap() else {
            panic!("expected a completion");
        };
        assert!(text.starts_with("Error:"));
    }

    #[tokio::test]
    async fn test_hosts_are_listed_off_the_loop() {
        let (driver, mut rx, _) = driver();
        driver.run(Effect::ListHosts);
        assert_eq!(
            rx.recv().await.unwrap(),
            SessionEvent::HostsListed(vec!["web1".into(), "db".into()])
        );
    }

    #[tokio::test]
    async fn test_open_image_and_exit() {
        let (driver, _rx, viewer) = driver();
        driver.run(Effect::OpenImage(PathBuf::from("/tmp/a.png")));
        for _ in 0..100 {
            if !viewer.opened.lock().unwrap().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(*viewer.opened.lock().unwrap(), vec![PathBuf::from("/tmp/a.png")]);
        assert_eq!(driver.run(Effect::Exit), ControlFlow::Break(()));
    }
}
