//! Inputs to and outputs of the session state machine.

use std::path::PathBuf;

use cicy_core::Notification;

/// A key press, already decoded from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Backspace,
    Enter,
    Up,
    Down,
    /// Quits from normal mode, cancels host selection.
    Esc,
    /// Weak exit request; needs confirming.
    Interrupt,
}

/// Everything the session reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Key(KeyInput),
    /// Animation tick.
    Tick,
    /// The outstanding request finished; errors arrive as text too.
    Completed { text: String },
    Notification(Notification),
    /// Result of [`Effect::ListHosts`].
    HostsListed(Vec<String>),
}

/// Work requested by the session, run outside of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// `POST /message` to the protocol server.
    Submit { text: String },
    /// Run `command` on `host`.
    RunRemote { host: String, command: String },
    /// Read the host catalog off the event loop.
    ListHosts,
    OpenImage(PathBuf),
    Exit,
}
