//! The interactive session state machine.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use cicy_core::Notification;
use tracing::debug;

use crate::{
    event::{Effect, KeyInput, SessionEvent},
    exit::ExitGuard,
    transcript::{Line, LineKind, banner},
};

/// Command opening the host selection.
pub const HOSTS_COMMAND: &str = "/ssh";
/// Command leaving the connected host.
pub const DISCONNECT_COMMAND: &str = "/exit";
/// Key opening the announced image.
pub const OPEN_IMAGE_KEY: char = 'o';

/// Which input mode is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// One request is outstanding; input is locked.
    Pending { started: Instant, dots: u8 },
    /// Modal host list.
    HostSelect { hosts: Vec<String>, cursor: usize },
}

/// State of one interactive client.
///
/// Owned by a single event loop; every transition happens in
/// [`Session::handle`], which takes the current time so tests control
/// the clock.
#[derive(Debug)]
pub struct Session {
    input: String,
    transcript: Vec<Line>,
    mode: Mode,
    remote: Option<String>,
    pending_image: Option<PathBuf>,
    exit_guard: ExitGuard,
    server_online: bool,
}

impl Session {
    /// New session; `server_port` is `None` when the server is not running.
    #[must_use]
    pub fn new(server_port: Option<u16>) -> Self {
        Self {
            input: String::new(),
            transcript: banner(server_port),
            mode: Mode::Normal,
            remote: None,
            pending_image: None,
            exit_guard: ExitGuard::default(),
            server_online: server_port.is_some(),
        }
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn transcript(&self) -> &[Line] {
        &self.transcript
    }

    #[must_use]
    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Host that plain input is forwarded to.
    #[must_use]
    pub fn remote(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    #[must_use]
    pub fn pending_image(&self) -> Option<&Path> {
        self.pending_image.as_deref()
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.mode, Mode::Pending { .. })
    }

    /// Input prompt, naming the connected host if any.
    #[must_use]
    pub fn prompt(&self) -> String {
        self.remote
            .as_ref()
            .map_or_else(|| ">".to_string(), |host| format!("[{host}]>"))
    }

    /// Animated wait indicator while a request is outstanding.
    #[must_use]
    pub fn loading_text(&self) -> Option<String> {
        match self.mode {
            Mode::Pending { dots, .. } => Some(format!("  Sending{}", ".".repeat(usize::from(dots)))),
            _ => None,
        }
    }

    /// Key hints for the footer.
    #[must_use]
    pub fn help_text(&self) -> String {
        let base = "Ctrl+C twice to quit | ESC to quit";
        if self.pending_image.is_some() {
            format!("Press 'o' to open image | {base}")
        } else if self.remote.is_some() {
            format!("{DISCONNECT_COMMAND} to disconnect SSH | {base}")
        } else {
            base.to_string()
        }
    }

    /// Apply one event.
    pub fn handle(&mut self, event: SessionEvent, now: Instant) -> Option<Effect> {
        match event {
            SessionEvent::Key(key) => self.on_key(key, now),
            SessionEvent::Tick => {
                if let Mode::Pending { dots, .. } = &mut self.mode {
                    *dots = (*dots + 1) % 4;
                }
                None
            }
            SessionEvent::Completed { text } => {
                self.on_completed(&text, now);
                None
            }
            SessionEvent::Notification(notification) => {
                self.on_notification(notification);
                None
            }
            SessionEvent::HostsListed(hosts) => {
                self.on_hosts_listed(hosts);
                None
            }
        }
    }

    fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        self.transcript.push(Line::new(kind, text));
    }

    fn on_key(&mut self, key: KeyInput, now: Instant) -> Option<Effect> {
        if key == KeyInput::Interrupt {
            if self.exit_guard.press(now) {
                return Some(Effect::Exit);
            }
            self.push(LineKind::Status, "  Press Ctrl+C again to exit");
            return None;
        }

        match &mut self.mode {
            Mode::HostSelect { hosts, cursor } => match key {
                KeyInput::Esc | KeyInput::Char('q') => {
                    self.mode = Mode::Normal;
                    self.input.clear();
                    None
                }
                KeyInput::Up | KeyInput::Char('k') => {
                    *cursor = cursor.saturating_sub(1);
                    None
                }
                KeyInput::Down | KeyInput::Char('j') => {
                    if *cursor + 1 < hosts.len() {
                        *cursor += 1;
                    }
                    None
                }
                KeyInput::Enter => {
                    let host = hosts.get(*cursor).cloned();
                    self.mode = Mode::Normal;
                    self.input.clear();
                    if let Some(host) = host {
                        self.push(LineKind::Status, format!("✓ Connected to: {host}"));
                        self.remote = Some(host);
                    }
                    None
                }
                _ => None,
            },
            Mode::Pending { .. } => (key == KeyInput::Esc).then_some(Effect::Exit),
            Mode::Normal => self.on_normal_key(key, now),
        }
    }

    fn on_normal_key(&mut self, key: KeyInput, now: Instant) -> Option<Effect> {
        match key {
            KeyInput::Esc => Some(Effect::Exit),
            KeyInput::Char(OPEN_IMAGE_KEY) if self.input.is_empty() && self.pending_image.is_some() => {
                let path = self.pending_image.take()?;
                self.push(LineKind::Status, "  ✓ Image opened");
                Some(Effect::OpenImage(path))
            }
            KeyInput::Char(c) => {
                self.input.push(c);
                None
            }
            KeyInput::Backspace => {
                self.input.pop();
                None
            }
            KeyInput::Enter => self.submit(now),
            KeyInput::Up | KeyInput::Down | KeyInput::Interrupt => None,
        }
    }

    fn submit(&mut self, now: Instant) -> Option<Effect> {
        let input = std::mem::take(&mut self.input);
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if input == HOSTS_COMMAND {
            return Some(Effect::ListHosts);
        }

        if input == DISCONNECT_COMMAND {
            if let Some(host) = self.remote.take() {
                self.push(LineKind::Status, format!("✓ Disconnected: {host}"));
                return None;
            }
        }

        if let Some(host) = &self.remote {
            let effect = Effect::RunRemote {
                host: host.clone(),
                command: input.to_string(),
            };
            self.push(LineKind::User, format!("$ {input}"));
            self.mode = Mode::Pending { started: now, dots: 0 };
            return Some(effect);
        }

        self.push(LineKind::User, format!("You: {input}"));
        if !self.server_online {
            self.push(
                LineKind::Error,
                "❌ Error: server is not running, cannot send message",
            );
            return None;
        }

        self.mode = Mode::Pending { started: now, dots: 0 };
        Some(Effect::Submit {
            text: input.to_string(),
        })
    }

    fn on_completed(&mut self, text: &str, now: Instant) {
        let Mode::Pending { started, .. } = self.mode else {
            debug!("Completion without a pending request");
            return;
        };
        self.mode = Mode::Normal;

        for line in text.split('\n') {
            self.push(LineKind::Reply, format!("✓ {line}"));
        }
        let elapsed = now.saturating_duration_since(started).as_secs_f64();
        self.push(LineKind::Elapsed, format!("  - {elapsed:.2}"));
    }

    fn on_hosts_listed(&mut self, hosts: Vec<String>) {
        if self.mode != Mode::Normal {
            debug!("Host list arrived outside normal mode");
            return;
        }
        if hosts.is_empty() {
            self.push(LineKind::Status, "  No SSH hosts found");
        } else {
            debug!(count = hosts.len(), "Entering host selection");
            self.mode = Mode::HostSelect { hosts, cursor: 0 };
        }
    }

    fn on_notification(&mut self, notification: Notification) {
        match notification {
            Notification::NewText { text } => {
                self.push(LineKind::Incoming, format!("📨 {text}"));
            }
            Notification::NewImage { path, size_label } => {
                self.push(
                    LineKind::Incoming,
                    format!("🖼️  Image received ({size_label})"),
                );
                self.push(LineKind::Status, "  Press 'o' to open the image");
                self.pending_image = Some(path);
            }
        }
    }
}
