//! Double-press exit confirmation.

use std::time::{Duration, Instant};

/// Window in which a second interrupt confirms the exit.
pub const EXIT_WINDOW: Duration = Duration::from_secs(2);

/// Tracks weak exit requests (Ctrl+C).
///
/// The first press opens a window; a second press inside it confirms.
/// A press after the window has closed opens a new one.
#[derive(Debug, Clone, Copy)]
pub struct ExitGuard {
    window: Duration,
    opened: Option<Instant>,
}

impl Default for ExitGuard {
    fn default() -> Self {
        Self::new(EXIT_WINDOW)
    }
}

impl ExitGuard {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            opened: None,
        }
    }

    /// Register a press at `now`. Returns `true` when the exit is confirmed.
    pub fn press(&mut self, now: Instant) -> bool {
        match self.opened {
            Some(opened) if now.saturating_duration_since(opened) <= self.window => {
                self.opened = None;
                true
            }
            _ => {
                self.opened = Some(now);
                false
            }
        }
    }
}
