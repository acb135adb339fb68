//! Transcript lines.

/// What a line represents; the terminal picks a style from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Banner,
    /// Echo of what the user typed.
    User,
    /// A line of a reply or remote command output.
    Reply,
    /// Elapsed time of the last request.
    Elapsed,
    /// Pushed by the server.
    Incoming,
    Status,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

impl Line {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

const LOGO: &[&str] = &[
    "",
    "      ██████╗ ██╗ ██████╗ ██╗   ██╗",
    "     ██╔════╝ ██║██╔════╝ ╚██╗ ██╔╝",
    "     ██║      ██║██║       ╚████╔╝ ",
    "     ██║      ██║██║        ╚██╔╝  ",
    "     ╚██████╗ ██║╚██████╗    ██║   ",
    "      ╚═════╝ ╚═╝ ╚═════╝    ╚═╝   ",
    "",
    "        MCP Message Communication System",
    "        ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━",
    "",
];

/// Opening lines, including the server port when it is running.
#[must_use]
pub fn banner(server_port: Option<u16>) -> Vec<Line> {
    let mut lines: Vec<Line> = LOGO.iter().map(|l| Line::new(LineKind::Banner, *l)).collect();
    if let Some(port) = server_port {
        lines.push(Line::new(
            LineKind::Banner,
            format!("        🚀 Server started (port: {port})"),
        ));
        lines.push(Line::new(LineKind::Banner, ""));
    }
    lines
}
