//! Command line flags.

use std::path::PathBuf;

use cicy_server::ServerConfig;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "cicy", version, about = "MCP message communication system")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Server port
    #[arg(short, long, env = "CICY_PORT", default_value_t = cicy_server::config::DEFAULT_PORT, global = true)]
    pub port: u16,

    /// Address the server binds to
    #[arg(long, env = "CICY_HOST", default_value = "127.0.0.1", global = true)]
    pub host: String,

    /// File holding the ingestion token
    #[arg(long, env = "CICY_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Directory ingested images are saved to
    #[arg(long, env = "CICY_IMAGE_DIR", global = true)]
    pub image_dir: Option<PathBuf>,

    /// Log file used while the terminal UI is running
    #[arg(long, env = "CICY_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Command used to open images, e.g. "feh --scale-down"
    #[arg(long, env = "CICY_VIEWER")]
    pub viewer: Option<String>,

    /// ssh client config listing the selectable hosts
    #[arg(long, env = "CICY_SSH_CONFIG")]
    pub ssh_config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run only the server, logging to stderr
    Serve,
}

impl Cli {
    /// Server settings with flag overrides applied.
    #[must_use]
    pub fn server_config(&self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            token_file: self.token_file.clone().unwrap_or(defaults.token_file),
            image_dir: self.image_dir.clone().unwrap_or(defaults.image_dir),
            ..defaults
        }
    }

    /// Where the interactive client writes its log.
    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("data")
                .join("cicy.log")
        })
    }
}
