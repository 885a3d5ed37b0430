//! HTTP/SSE transport
//!
//! Serves MCP over HTTP with Server-Sent Events. Each incoming SSE
//! connection gets its own handler instance from the factory closure.

use crate::server::GitLabMcpHandler;
use crate::util::find_available_port;
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Default port for the HTTP/SSE transport
pub const DEFAULT_HTTP_PORT: u16 = 20289;

/// HTTP/SSE server configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Address to bind to
    pub bind: SocketAddr,
    /// Path clients connect to for the SSE stream
    pub sse_path: String,
    /// Path clients POST protocol messages to
    pub post_path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], DEFAULT_HTTP_PORT)),
            sse_path: "/sse".to_string(),
            post_path: "/message".to_string(),
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

    /// Build a config from separate host and port values.
    pub fn from_host_port(host: &str, port: u16) -> Result<Self, std::net::AddrParseError> {
        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        Ok(Self::new(addr))
    }
}

/// Start the HTTP/SSE server and return a token that stops it.
///
/// If the configured port is already taken, a nearby free port is
/// picked instead and logged.
pub async fn run_http<F>(
    handler_factory: F,
    config: HttpConfig,
) -> anyhow::Result<CancellationToken>
where
    F: Fn() -> GitLabMcpHandler + Send + Sync + 'static,
{
    let host = config.bind.ip().to_string();
    let actual_port = find_available_port(&host, config.bind.port()).await?;
    let bind_addr = SocketAddr::new(config.bind.ip(), actual_port);

    let ct = CancellationToken::new();

    let sse_server = SseServer::serve_with_config(SseServerConfig {
        bind: bind_addr,
        sse_path: config.sse_path,
        post_path: config.post_path,
        ct: ct.clone(),
        sse_keep_alive: None,
    })
    .await?;

    info!(
        "HTTP/SSE server listening on http://{} (sse: {}, post: {})",
        sse_server.config.bind, sse_server.config.sse_path, sse_server.config.post_path
    );

    let server_ct = sse_server.with_service(handler_factory);

    Ok(server_ct)
}

/// Start the HTTP/SSE server and block until Ctrl+C or cancellation.
pub async fn run_http_blocking<F>(handler_factory: F, config: HttpConfig) -> anyhow::Result<()>
where
    F: Fn() -> GitLabMcpHandler + Send + Sync + 'static,
{
    let ct = run_http(handler_factory, config).await?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("received shutdown signal");
        }
        _ = ct.cancelled() => {
            info!("server cancelled");
        }
    }

    ct.cancel();
    info!("HTTP/SSE server stopped");
    Ok(())
}
