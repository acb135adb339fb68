//! Protocol server of the cicy message relay.
//!
//! Exposes one [`MessageStore`] through two surfaces:
//! - `POST /mcp` - MCP-style JSON-RPC (`initialize`, `tools/list`, `tools/call`)
//! - REST - `POST /message`, `GET /messages`, `GET /health` and the
//!   token-protected `POST /api/message` ingestion endpoint

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod ingest;
pub mod mcp;
pub mod protocol;
pub mod replies;
pub mod rest;
pub mod sink;
pub mod token;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use cicy_core::{ImageSink, MessageStore, NotificationChannel};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub use auth::AuthToken;
pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use fetch::{FetchError, ImageFetcher};
pub use sink::FsImageSink;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MessageStore>,
    pub notifier: Arc<NotificationChannel>,
    pub images: Arc<dyn ImageSink>,
    pub fetcher: ImageFetcher,
    pub token: AuthToken,
}

impl AppState {
    /// Assemble state from a config, a store and a notification channel.
    ///
    /// # Errors
    /// Returns error if the image download client cannot be built.
    pub fn from_config(
        config: &ServerConfig,
        store: Arc<MessageStore>,
        notifier: Arc<NotificationChannel>,
        token: AuthToken,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            store,
            notifier,
            images: Arc::new(FsImageSink::new(config.image_dir.clone())),
            fetcher: ImageFetcher::new(config.fetch_timeout)?
                .with_max_bytes(config.body_limit),
            token,
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            store: Arc::new(MessageStore::new()),
            notifier: Arc::new(NotificationChannel::new()),
            images: Arc::new(FsImageSink::new(std::env::temp_dir().join("cicy-test-images"))),
            fetcher: ImageFetcher::new(std::time::Duration::from_secs(5))
                .expect("client builds"),
            token: AuthToken::new("test-token"),
        }
    }
}

/// Build the router serving both surfaces.
pub fn create_router(state: AppState, body_limit: usize) -> Router {
    let ingest = Router::new()
        .route("/api/message", post(ingest::ingest_message))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .route("/mcp", post(mcp::handle_rpc))
        .route("/message", post(rest::submit_message))
        .route("/messages", get(rest::list_messages))
        .route("/health", get(rest::health))
        .merge(ingest)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the configured address.
///
/// Kept separate from [`serve`] so callers can report a busy port and
/// carry on without the server.
///
/// # Errors
/// Returns error if the address is invalid or cannot be bound.
pub async fn bind(config: &ServerConfig) -> std::io::Result<TcpListener> {
    let addr = config
        .socket_addr()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    TcpListener::bind(addr).await
}

/// Serve `router` on `listener` until the process ends.
///
/// # Errors
/// Returns error if the accept loop fails.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    let addr: SocketAddr = listener.local_addr()?;
    info!("Server listening on http://{addr}");
    info!("MCP endpoint: http://{addr}/mcp");
    axum::serve(listener, router).await
}
