//! Web interface for review analysis
//!
//! Serves an HTML form backed by the same [`ReviewAnalyzer`] used by the
//! CLI, plus a small JSON API.

pub mod api;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::analyzer::ReviewAnalyzer;
use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::render::ReportRenderer;

pub use api::{create_router, ApiResponse, ErrorResponse, HealthResponse};

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Analysis pipeline, immutable after startup
    pub analyzer: Arc<ReviewAnalyzer>,

    /// Compiled templates
    pub renderer: Arc<ReportRenderer<'static>>,

    /// Minimum review length accepted by the form and API
    pub min_review_chars: usize,

    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    pub fn new(analyzer: ReviewAnalyzer, min_review_chars: usize) -> Result<Self> {
        Ok(Self {
            analyzer: Arc::new(analyzer),
            renderer: Arc::new(ReportRenderer::new()?),
            min_review_chars,
            start_time: Instant::now(),
        })
    }
}

// ============================================================================
// Review Server
// ============================================================================

/// HTTP server wrapping the analyzer
pub struct ReviewServer {
    addr: SocketAddr,
    state: AppState,
}

impl ReviewServer {
    /// Create a server bound to `addr` once started
    pub fn new(addr: SocketAddr, analyzer: ReviewAnalyzer, config: &ServerConfig) -> Result<Self> {
        Ok(Self {
            addr,
            state: AppState::new(analyzer, config.min_review_chars)?,
        })
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes and middleware
    pub fn build_router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Serve until `shutdown_signal` resolves
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| Error::Server(format!("failed to bind {}: {e}", self.addr)))?;

        tracing::info!(addr = %self.addr, "Review server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        tracing::info!("Review server stopped");
        Ok(())
    }
}

/// Router with CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    create_router(state).layer(
        ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        ),
    )
}

/// Resolves on Ctrl+C
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
