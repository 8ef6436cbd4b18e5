// ============================================================
// Layer 1 — Web Presentation Layer
// ============================================================
// A single-page form served by axum:
//
//   GET  /          — empty form
//   POST /          — form submit; same page with the reply
//   POST /api/chat  — JSON {"question"} → {"response"}
//   GET  /health    — liveness probe
//
// All answering is delegated to Layer 2 (ChatUseCase).

pub mod handlers;
pub mod page;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::application::chat_use_case::ChatUseCase;
use page::Page;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 7860 }
    }
}

pub struct AppState {
    pub chat: Arc<ChatUseCase>,
    pub page: Page,
}

impl AppState {
    pub fn new(chat: Arc<ChatUseCase>) -> Result<Self> {
        Ok(Self { chat, page: Page::new()? })
    }
}

pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::ask_form))
        .route("/api/chat", post(handlers::api_chat))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind, serve until Ctrl+C / SIGTERM, then drain in-flight requests.
pub async fn serve(config: &ServerConfig, chat: Arc<ChatUseCase>) -> Result<()> {
    let app = build_app(Arc::new(AppState::new(chat)?));

    let bind_addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Cannot bind to {bind_addr}"))?;
    info!("Serving chatbot on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
