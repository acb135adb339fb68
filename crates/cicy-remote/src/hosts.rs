//! Host aliases from an OpenSSH client config.

use std::path::{Path, PathBuf};

use cicy_core::HostCatalog;
use tracing::debug;

/// Reads `Host` aliases from an ssh config file on every lookup, so edits
/// show up without a restart.
#[derive(Debug, Clone)]
pub struct SshConfigCatalog {
    path: PathBuf,
}

impl Default for SshConfigCatalog {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(home.join(".ssh").join("config"))
    }
}

impl SshConfigCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HostCatalog for SshConfigCatalog {
    fn hosts(&self) -> Vec<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => parse_hosts(&contents),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "ssh config not readable");
                Vec::new()
            }
        }
    }
}

/// Concrete host aliases in file order, without duplicates.
///
/// Patterns (`*`, `?`) and negations (`!`) name no single host and are
/// left out.
#[must_use]
pub fn parse_hosts(contents: &str) -> Vec<String> {
    let mut hosts: Vec<String> = Vec::new();
    for line in contents.lines() {
        let Some(aliases) = host_aliases(line.trim()) else {
            continue;
        };
        // A `#` token starts a trailing comment.
        for alias in aliases.split_whitespace().take_while(|a| !a.starts_with('#')) {
            let alias = alias.trim_matches('"');
            if alias.is_empty() || alias.contains(['*', '?', '!']) {
                continue;
            }
            if !hosts.iter().any(|h| h == alias) {
                hosts.push(alias.to_string());
            }
        }
    }
    hosts
}

// Keywords are case-insensitive and may be separated by spaces or `=`.
fn host_aliases(line: &str) -> Option<&str> {
    let keyword = line.get(..4)?;
    if !keyword.eq_ignore_ascii_case("host") {
        return None;
    }
    let rest = &line[4..];
    let trimmed = rest.trim_start();
    let rest = match trimmed.strip_prefix('=') {
        Some(after) => after,
        None if trimmed.len() < rest.len() => trimmed,
        // `HostName`, `HostKeyAlias`, ...
        None => return None,
    };
    Some(rest.trim())
}
