//! Streamable HTTP transport
//!
//! Serves MCP over HTTP at a single endpoint using rmcp's streamable HTTP
//! service mounted in an axum router.

use crate::config::DEFAULT_HTTP_PORT;
use crate::error::TransportError;
use crate::server::GatewayHandler;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Address to bind to (e.g., "127.0.0.1:20289")
    pub bind: SocketAddr,
    /// Path of the MCP endpoint
    pub path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], DEFAULT_HTTP_PORT)),
            path: "/mcp".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn new(bind: SocketAddr) -> Self {
        Self {
            bind,
            ..Default::default()
        }
    }

    /// Create config from host and port
    pub fn from_host_port(host: &str, port: u16) -> Result<Self, TransportError> {
        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        Ok(Self::new(addr))
    }
}

/// Build the axum router serving MCP at `config.path`
///
/// Each new session gets its own handler from `handler_factory`.
pub fn router<F>(handler_factory: F, config: &HttpConfig) -> axum::Router
where
    F: Fn() -> GatewayHandler + Send + Sync + 'static,
{
    let service = StreamableHttpService::new(
        move || Ok(handler_factory()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    axum::Router::new()
        .nest_service(&config.path, service)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until `ct` is cancelled
pub async fn run_http<F>(
    handler_factory: F,
    config: HttpConfig,
    ct: CancellationToken,
) -> anyhow::Result<()>
where
    F: Fn() -> GatewayHandler + Send + Sync + 'static,
{
    let app = router(handler_factory, &config);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(TransportError::Io)?;

    info!(
        "GitLab gateway listening on http://{}{}",
        listener.local_addr().map_err(TransportError::Io)?,
        config.path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await
        .map_err(|e| TransportError::Http(e.to_string()))?;

    info!("HTTP server stopped");
    Ok(())
}

/// Run the HTTP server and stop on Ctrl+C
pub async fn run_http_blocking<F>(handler_factory: F, config: HttpConfig) -> anyhow::Result<()>
where
    F: Fn() -> GatewayHandler + Send + Sync + 'static,
{
    let ct = CancellationToken::new();

    let shutdown = ct.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal");
        }
        shutdown.cancel();
    });

    info!("Press Ctrl+C to stop the server");
    run_http(handler_factory, config, ct).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.bind.port(), DEFAULT_HTTP_PORT);
        assert_eq!(config.path, "/mcp");
    }

    #[test]
    fn test_from_host_port() {
        let config = HttpConfig::from_host_port("0.0.0.0", 8080).unwrap();
        assert_eq!(config.bind.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_invalid_host() {
        assert!(matches!(
            HttpConfig::from_host_port("not a host", 8080),
            Err(TransportError::InvalidAddress(_))
        ));
    }
}
