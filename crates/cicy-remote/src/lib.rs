//! Local collaborators of the interactive session.
//!
//! This crate provides:
//! - `SshExecutor` - Runs a command on a remote host through `ssh`
//! - `SshConfigCatalog` - Host aliases from `~/.ssh/config`
//! - `SystemImageViewer` - Opens images with the platform opener
//! - Command line building and executable resolution

pub mod command;
pub mod hosts;
pub mod resolve;
pub mod ssh;
pub mod viewer;

pub use command::{CommandBuildError, CommandBuilder, CommandParts};
pub use hosts::{SshConfigCatalog, parse_hosts};
pub use resolve::resolve_executable_path;
pub use ssh::SshExecutor;
pub use viewer::SystemImageViewer;
