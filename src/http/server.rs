//! HTTP server setup.
//!
//! # Responsibilities
//! - Wrap a built route tree with transport-level layers (timeout, body
//!   limit, request tracing)
//! - Bind the server to a listener
//! - Drain in-flight requests on shutdown
//!
//! # Design Decisions
//! - The route tree is built before the server exists; a build error never
//!   reaches this module
//! - Transport layers wrap the whole router so they also cover 404 and 405

use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::lifecycle::Shutdown;

/// HTTP server for a built route tree.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Wrap `router` with the layers `config` asks for.
    pub fn new(config: ServerConfig, router: Router) -> Self {
        let router = Self::layer_router(&config, router);
        Self { router, config }
    }

    #[allow(deprecated)]
    fn layer_router(config: &ServerConfig, router: Router) -> Router {
        router
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for driving without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires or Ctrl+C.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            max_body_size = self.config.limits.max_body_size,
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(Shutdown::signalled(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
