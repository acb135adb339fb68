//! `cicy`: terminal client with an embedded MCP message server.
//!
//! Run with: cargo run -p cicy-cli
//!
//! `cicy serve` runs the server alone.

mod cli;
mod keys;
mod logging;
mod ui;

use std::{io, sync::Arc, time::Instant};

use anyhow::Context;
use cicy_core::{MessageStore, NotificationChannel};
use cicy_remote::{SshConfigCatalog, SshExecutor, SystemImageViewer};
use cicy_server::{AppState, AuthToken, ServerConfig, token};
use cicy_session::{Driver, MessageClient, Session, SessionConfig, SessionEvent, TICK_INTERVAL};
use clap::Parser;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Some(Command::Serve) => {
            logging::init_stderr();
            serve(&cli.server_config()).await
        }
        None => {
            logging::init_file(&cli.log_file())?;
            interactive(&cli).await
        }
    }
}

fn app_state(
    config: &ServerConfig,
    store: Arc<MessageStore>,
    notifier: Arc<NotificationChannel>,
) -> anyhow::Result<AppState> {
    let token = token::load_or_generate(&config.token_file);
    info!(token_file = %config.token_file.display(), "Ingestion requires the stored token");
    AppState::from_config(config, store, notifier, AuthToken::new(token))
        .context("failed to build server state")
}

async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    let state = app_state(
        config,
        Arc::new(MessageStore::new()),
        Arc::new(NotificationChannel::new()),
    )?;
    let listener = cicy_server::bind(config)
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    cicy_server::serve(listener, cicy_server::create_router(state, config.body_limit)).await?;
    Ok(())
}

/// Start the server in the background. A busy port leaves the client
/// running without it.
async fn start_embedded_server(
    config: &ServerConfig,
    notifier: Arc<NotificationChannel>,
) -> anyhow::Result<Option<u16>> {
    let listener = match cicy_server::bind(config).await {
        Ok(listener) => listener,
        Err(e) => {
            warn!(port = config.port, error = %e, "Server not started");
            return Ok(None);
        }
    };
    let port = listener.local_addr()?.port();
    let state = app_state(config, Arc::new(MessageStore::new()), notifier)?;
    let router = cicy_server::create_router(state, config.body_limit);
    tokio::spawn(async move {
        if let Err(e) = cicy_server::serve(listener, router).await {
            warn!(error = %e, "Server stopped");
        }
    });
    Ok(Some(port))
}

async fn interactive(cli: &Cli) -> anyhow::Result<()> {
    let notifier = Arc::new(NotificationChannel::new());
    let notifications = notifier.attach();
    let port = start_embedded_server(&cli.server_config(), notifier).await?;

    let config = port.map_or_else(SessionConfig::default, SessionConfig::local);
    let client = config
        .server_url
        .as_ref()
        .map(|url| MessageClient::new(url.clone(), config.request_timeout))
        .transpose()
        .context("failed to build HTTP client")?;
    let viewer = cli
        .viewer
        .as_deref()
        .map_or_else(SystemImageViewer::default, SystemImageViewer::with_command);
    let hosts = cli
        .ssh_config
        .clone()
        .map_or_else(SshConfigCatalog::default, SshConfigCatalog::new);

    let (driver, completions) = Driver::new(
        client,
        Arc::new(SshExecutor::new(config.remote_timeout)),
        Arc::new(viewer),
        Arc::new(hosts),
    );
    let session = Session::new(port);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run_app(&mut terminal, session, &driver, completions, notifications).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut session: Session,
    driver: &Driver,
    mut completions: mpsc::UnboundedReceiver<SessionEvent>,
    mut notifications: mpsc::Receiver<cicy_core::Notification>,
) -> anyhow::Result<()> {
    let mut input = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);

    loop {
        terminal.draw(|f| ui::draw(f, &session))?;

        let event = tokio::select! {
            maybe = input.next() => match maybe {
                Some(Ok(Event::Key(key))) => keys::key_input(&key).map(SessionEvent::Key),
                Some(Ok(_)) => None,
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            _ = ticker.tick() => Some(SessionEvent::Tick),
            Some(done) = completions.recv() => Some(done),
            Some(notification) = notifications.recv() => Some(SessionEvent::Notification(notification)),
        };

        if let Some(effect) = event.and_then(|event| session.handle(event, Instant::now())) {
            if driver.run(effect).is_break() {
                return Ok(());
            }
        }
    }
}
