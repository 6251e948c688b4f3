//! Stdio transport
//!
//! Runs the MCP server over standard input/output.

use crate::server::GatewayHandler;
use rmcp::ServiceExt;
use rmcp::transport::io::stdio;
use tracing::info;

/// Run the MCP server using stdio transport
pub async fn run_stdio(handler: GatewayHandler) -> anyhow::Result<()> {
    info!("Starting GitLab gateway with stdio transport");

    let server = handler.serve(stdio()).await?;
    let reason = server.waiting().await?;

    info!(?reason, "GitLab gateway stopped");
    Ok(())
}
