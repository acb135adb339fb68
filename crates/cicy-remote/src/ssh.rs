//! Remote command execution through the system `ssh` client.

use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use cicy_core::traits::{ExecutorError, RemoteExecutor};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::command::{CommandBuildError, CommandBuilder};

/// Default ceiling for one remote command.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs `ssh <host> <command>` and returns stdout and stderr together.
#[derive(Debug, Clone)]
pub struct SshExecutor {
    command: CommandBuilder,
    timeout: Duration,
}

impl Default for SshExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_REMOTE_TIMEOUT)
    }
}

impl SshExecutor {
    /// Executor using `ssh` from `PATH`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self::with_command(CommandBuilder::new("ssh"), timeout)
    }

    /// Executor using a custom client command; host and command are
    /// appended as the last two arguments.
    #[must_use]
    pub const fn with_command(command: CommandBuilder, timeout: Duration) -> Self {
        Self { command, timeout }
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    async fn run(&self, host: &str, command: &str) -> Result<String, ExecutorError> {
        let parts = self.command.build(&[host, command]).map_err(build_error)?;
        let (program, args) = parts.into_resolved().await.map_err(build_error)?;

        debug!(%host, %command, program = %program.display(), "Running remote command");

        let child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(%host, %command, "Remote command timed out");
                return Err(ExecutorError::TimedOut(self.timeout.as_secs()));
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let combined = combined.trim().to_string();

        if output.status.success() {
            Ok(combined)
        } else {
            Err(ExecutorError::Failed {
                status: output.status.to_string(),
                output: combined,
            })
        }
    }
}

fn build_error(e: CommandBuildError) -> ExecutorError {
    match e {
        CommandBuildError::NotFound(name) => ExecutorError::ExecutableNotFound(name),
        other => ExecutorError::SpawnFailed(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            other,
        )),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    // `sh -c <script> <host> <command>` binds host to $0 and command to $1.
    fn fake_ssh(script: &str, timeout: Duration) -> SshExecutor {
        SshExecutor::with_command(CommandBuilder::new("sh").params(["-c", script]), timeout)
    }

    #[tokio::test]
    async fn test_combined_and_trimmed_output() {
        let executor = fake_ssh(
            r#"echo "host=$0"; echo "cmd=$1"; echo "warn" >&2"#,
            Duration::from_secs(10),
        );
        let output = executor.run("web1", "ls -la").await.unwrap();
        assert_eq!(output, "host=web1\ncmd=ls -la\nwarn");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_failure() {
        let executor = fake_ssh("echo denied; exit 3", Duration::from_secs(10));
        match executor.run("web1", "rm -rf /").await {
            Err(ExecutorError::Failed { output, .. }) => assert_eq!(output, "denied"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout() {
        let executor = fake_ssh("sleep 10", Duration::from_secs(1));
        assert!(matches!(
            executor.run("web1", "x").await,
            Err(ExecutorError::TimedOut(1))
        ));
    }

    #[tokio::test]
    async fn test_missing_client() {
        let executor = SshExecutor::with_command(
            CommandBuilder::new("cicy-no-such-ssh-7f3a"),
            Duration::from_secs(1),
        );
        assert!(matches!(
            executor.run("web1", "x").await,
            Err(ExecutorError::ExecutableNotFound(_))
        ));
    }
}
