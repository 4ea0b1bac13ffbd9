//!
//! previewgate HTTP server
//! -----------------------
//! Axum router for the draft-mode activator, the credentialed preview proxy
//! and the upstream health probe.

use crate::config::{PreviewConfig, redacted_endpoint};
use crate::draft::DraftMode;
use crate::error::ServerError;
use crate::{activator, health, proxy};
use axum::Router;
use axum::routing::{get, post};
use previewgate_upstream::UpstreamClient;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const ACTIVATE_PATH: &str = "/api/preview";
pub const PROXY_PATH: &str = "/api/preview-proxy";
pub const HEALTH_PATH: &str = "/api/preview-proxy/health";

/// Shared, read-only state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PreviewConfig>,
    pub draft: Arc<DraftMode>,
    pub upstream: UpstreamClient,
}

impl AppState {
    /// Validate the configuration and build the upstream client from it.
    pub fn new(config: PreviewConfig) -> Result<Self, ServerError> {
        config.validate()?;

        let mut builder = UpstreamClient::builder()
            .with_timeout(config.fetch_timeout)
            .with_insecure_tls(config.allow_insecure_tls);
        if let Some(ref ca_path) = config.ca_path {
            builder = builder.with_ca_file(ca_path);
        }
        let upstream = builder.build()?;

        Ok(Self {
            draft: Arc::new(DraftMode::from_config(&config)),
            config: Arc::new(config),
            upstream,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(ACTIVATE_PATH, get(activator::activate))
        .route(
            PROXY_PATH,
            post(proxy::proxy).fallback(proxy::method_not_allowed),
        )
        .route(HEALTH_PATH, get(health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn log_startup(config: &PreviewConfig) {
    for (key, value) in config.summary() {
        info!(target: "startup", "{} = {}", key, value);
    }
    if config.preview_secret.is_none() {
        warn!("PREVIEW_SECRET is not set; draft mode activation will reject every request");
    }
    match config.graphql_endpoint {
        Some(ref endpoint) => info!("Proxying preview GraphQL to {}", redacted_endpoint(endpoint)),
        None => warn!("WORDPRESS_GRAPHQL_ENDPOINT is not set; the preview proxy will answer 500"),
    }
    if config.credentials.is_none() {
        info!("No PREVIEW_USER/PREVIEW_APP_PASSWORD pair; upstream calls are unauthenticated");
    }
}

/// Serve on an already bound listener until Ctrl-C.
pub async fn serve(state: AppState, listener: TcpListener) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    info!("Starting server on {}", addr);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

pub async fn run(config: PreviewConfig) -> Result<(), ServerError> {
    log_startup(&config);
    let addr = config.listen_addr;
    let state = AppState::new(config)?;
    let listener = TcpListener::bind(addr).await?;
    serve(state, listener).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
