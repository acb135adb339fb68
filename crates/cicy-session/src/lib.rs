//! Interactive session of the cicy relay.
//!
//! The [`Session`] is a plain state machine: it consumes one
//! [`SessionEvent`] at a time and may return an [`Effect`]. The
//! [`Driver`] runs effects as background tasks and posts their completion
//! back as events, so the owning loop never waits on the network or on a
//! remote shell.

pub mod client;
pub mod config;
pub mod driver;
pub mod event;
pub mod exit;
pub mod session;
pub mod transcript;

pub use client::{ClientError, MessageClient};
pub use config::SessionConfig;
pub use driver::{Driver, TICK_INTERVAL};
pub use event::{Effect, KeyInput, SessionEvent};
pub use exit::ExitGuard;
pub use session::{Mode, Session};
pub use transcript::{Line, LineKind};
