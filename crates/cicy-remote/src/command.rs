//! Command line building.

use std::path::PathBuf;

use thiserror::Error;

use crate::resolve::resolve_executable_path;

/// Command build error.
#[derive(Debug, Error)]
pub enum CommandBuildError {
    #[error("Base command cannot be parsed: {0}")]
    InvalidBase(String),
    #[error("Base command is empty after parsing")]
    EmptyCommand,
    #[error("Executable not found: {0}")]
    NotFound(String),
}

/// Parsed command parts (program + args).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandParts {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandParts {
    /// Resolve the program to an absolute path.
    ///
    /// # Errors
    /// Returns error if the executable is not found.
    pub async fn into_resolved(self) -> Result<(PathBuf, Vec<String>), CommandBuildError> {
        let Self { program, args } = self;
        let executable = resolve_executable_path(&program)
            .await
            .ok_or(CommandBuildError::NotFound(program))?;
        Ok((executable, args))
    }
}

/// A base command line plus fixed parameters.
///
/// The base is split shell-style, so user supplied overrides such as
/// `"feh --scale-down"` work as expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuilder {
    pub base: String,
    pub params: Vec<String>,
}

impl CommandBuilder {
    #[must_use]
    pub fn new<S: Into<String>>(base: S) -> Self {
        Self {
            base: base.into(),
            params: Vec::new(),
        }
    }

    /// Append fixed parameters.
    #[must_use]
    pub fn params<I>(mut self, params: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.params.extend(params.into_iter().map(Into::into));
        self
    }

    /// Build the command with per-invocation arguments at the end.
    ///
    /// # Errors
    /// Returns error if the base cannot be split or nothing is left.
    pub fn build(&self, additional_args: &[&str]) -> Result<CommandParts, CommandBuildError> {
        let mut parts = shlex::split(&self.base)
            .ok_or_else(|| CommandBuildError::InvalidBase(self.base.clone()))?;
        parts.extend(self.params.iter().cloned());
        parts.extend(additional_args.iter().map(|a| (*a).to_string()));

        if parts.is_empty() {
            return Err(CommandBuildError::EmptyCommand);
        }

        let program = parts.remove(0);
        Ok(CommandParts {
            program,
            args: parts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_splits_base_and_appends() {
        let parts = CommandBuilder::new("ssh -o 'BatchMode yes'")
            .params(["-T"])
            .build(&["web1", "uptime -p"])
            .unwrap();
        assert_eq!(parts.program, "ssh");
        assert_eq!(parts.args, vec!["-o", "BatchMode yes", "-T", "web1", "uptime -p"]);
    }

    #[test]
    fn test_build_errors() {
        assert!(matches!(
            CommandBuilder::new("open 'unterminated").build(&[]),
            Err(CommandBuildError::InvalidBase(_))
        ));
        assert!(matches!(
            CommandBuilder::new("   ").build(&[]),
            Err(CommandBuildError::EmptyCommand)
        ));
    }

    #[tokio::test]
    async fn test_into_resolved_missing_program() {
        let parts = CommandBuilder::new("cicy-no-such-binary-7f3a").build(&[]).unwrap();
        assert!(matches!(
            parts.into_resolved().await,
            Err(CommandBuildError::NotFound(name)) if name == "cicy-no-such-binary-7f3a"
        ));
    }
}
