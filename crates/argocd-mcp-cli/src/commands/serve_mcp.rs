use anyhow::{Context, Result};
use argocd_mcp_core::config::{ArgoCdConfig, ServerConfig};
use argocd_mcp_core::types::Transport;
use argocd_mcp_query::client::ArgoCdClient;
use argocd_mcp_server::server::McpServer;
use std::sync::Arc;

/// Start the MCP server on the configured transport and block until it exits.
pub fn run(argocd: &ArgoCdConfig, server: &ServerConfig) -> Result<()> {
    let mcp = build_server(argocd)?;
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    match server.transport {
        Transport::Stdio => rt
            .block_on(argocd_mcp_server::server::run_stdio(mcp))
            .context("MCP stdio server error"),
        Transport::Http => rt
            .block_on(argocd_mcp_server::http::run_http_server(
                mcp,
                &server.bind_addr(),
            ))
            .with_context(|| format!("MCP HTTP server error on {}", server.bind_addr())),
    }
}

fn build_server(argocd: &ArgoCdConfig) -> Result<Arc<McpServer>> {
    let client = ArgoCdClient::new(argocd).context("Failed to build Argo CD client")?;
    Ok(Arc::new(McpServer::new(client)))
}
