//! HTTP front end for the order insights dashboard.
//!
//! Serves the four dashboard pages as server-rendered HTML with a sidebar
//! page selector and CSV upload, plus a small JSON API. Each browser session
//! (identified by a cookie) holds its own dataset; nothing is persisted.
//!
//! ```rust,ignore
//! use insights_server::{ServerConfig, serve};
//!
//! let config = ServerConfig::builder().build()?;
//! serve(config).await?;
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tracing::info;

pub use config::{ServerConfig, ServerConfigBuilder, ServerConfigError};
pub use error::{ApiError, ApiResult};
pub use state::{AppState, Session, SessionStore, spawn_session_sweeper};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.body_limit();

    Router::new()
        .route("/", get(routes::index))
        .route("/upload", post(routes::upload))
        .route("/clear", post(routes::clear))
        .route("/api/pages/{slug}", get(routes::page_json))
        .route("/api/dataset", get(routes::dataset_json))
        .route("/healthz", get(routes::healthz))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Bind, start the idle-session sweep and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let bind = config.bind;
    let state = AppState::new(config);
    let sweeper = spawn_session_sweeper(
        state.sessions.clone(),
        state.config.session_ttl,
        state.config.sweep_interval,
    );

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Dashboard listening on http://{}", listener.local_addr()?);

    let result = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    sweeper.abort();
    info!("Server stopped");
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
