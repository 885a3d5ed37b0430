//! Stdio transport
//!
//! Serves MCP over standard input/output, the transport most MCP
//! clients (editors, desktop apps) speak by default.

use crate::server::GitLabMcpHandler;
use rmcp::ServiceExt;
use rmcp::transport::io::stdio;
use tracing::info;

/// Serve the handler over stdin/stdout until the client disconnects.
pub async fn run_stdio(handler: GitLabMcpHandler) -> anyhow::Result<()> {
    info!(tools = handler.tool_count(), "serving MCP over stdio");

    let server = handler.serve(stdio()).await?;
    server.waiting().await?;

    info!("stdio transport closed");
    Ok(())
}
