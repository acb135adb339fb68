//! Opening images with the platform's default viewer.

use std::{path::Path, process::Stdio};

use async_trait::async_trait;
use cicy_core::traits::{ImageViewer, ViewerError};
use tokio::process::Command;
use tracing::debug;

use crate::command::{CommandBuildError, CommandBuilder};

/// Launches the image path with an opener command.
#[derive(Debug, Clone)]
pub struct SystemImageViewer {
    command: CommandBuilder,
}

impl Default for SystemImageViewer {
    fn default() -> Self {
        Self {
            command: platform_opener(),
        }
    }
}

fn platform_opener() -> CommandBuilder {
    if cfg!(target_os = "macos") {
        CommandBuilder::new("open")
    } else if cfg!(windows) {
        CommandBuilder::new("cmd").params(["/C", "start", ""])
    } else {
        CommandBuilder::new("xdg-open")
    }
}

impl SystemImageViewer {
    /// Viewer using a custom command line; the image path is appended.
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: CommandBuilder::new(command),
        }
    }
}

#[async_trait]
impl ImageViewer for SystemImageViewer {
    async fn open(&self, path: &Path) -> Result<(), ViewerError> {
        let path_arg = path.to_string_lossy();
        let (program, args) = self
            .command
            .build(&[path_arg.as_ref()])
            .map_err(|e| ViewerError::InvalidCommand(e.to_string()))?
            .into_resolved()
            .await
            .map_err(|e| match e {
                CommandBuildError::NotFound(name) => ViewerError::NotFound(name),
                other => ViewerError::InvalidCommand(other.to_string()),
            })?;

        debug!(program = %program.display(), path = %path.display(), "Opening image");
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(ViewerError::Exit(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_viewer() {
        let viewer = SystemImageViewer::with_command("cicy-no-such-viewer-7f3a");
        assert!(matches!(
            viewer.open(Path::new("/tmp/x.png")).await,
            Err(ViewerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unparsable_command() {
        let viewer = SystemImageViewer::with_command("feh 'oops");
        assert!(matches!(
            viewer.open(Path::new("/tmp/x.png")).await,
            Err(ViewerError::InvalidCommand(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status_is_reported() {
        let ok = SystemImageViewer::with_command("sh -c 'test -n \"$0\"'");
        ok.open(Path::new("/tmp/x.png")).await.unwrap();

        let failing = SystemImageViewer::with_command("false");
        assert!(matches!(
            failing.open(Path::new("/tmp/x.png")).await,
            Err(ViewerError::Exit(_))
        ));
    }
}
