mod commands;

use anyhow::Context;
use argocd_mcp_core::config::{ArgoCdConfig, ServerConfig};
use argocd_mcp_core::constants::{DEFAULT_HTTP_BIND, DEFAULT_HTTP_PORT};
use argocd_mcp_core::types::Transport;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "argocd-mcp",
    version,
    about = "MCP server reporting unhealthy Argo CD applications and resources",
    long_about = "Exposes read-only Argo CD queries as Model Context Protocol tools.\n\n\
        Values of --argocd-url, --argocd-token and --insecure that start with '$'\n\
        are read from the environment, e.g. --argocd-token '$ARGOCD_TOKEN'.\n\n\
        Examples:\n  \
        argocd-mcp --argocd-url https://argocd.example.com --argocd-token '$ARGOCD_TOKEN'\n  \
        argocd-mcp --transport stdio --argocd-url '$ARGOCD_URL' --argocd-token '$ARGOCD_TOKEN'"
)]
struct Cli {
    /// URL of the Argo CD server to query
    #[arg(long = "argocd-url")]
    argocd_url: String,

    /// Token to include in the Authorization header
    #[arg(long = "argocd-token")]
    argocd_token: String,

    /// Allow insecure TLS connections to the Argo CD server
    #[arg(long, default_value = "false")]
    insecure: String,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Transport mode: "http" or "stdio"
    #[arg(long, default_value = "http")]
    transport: Transport,

    /// HTTP server port (only used with --transport http)
    #[arg(short, long, default_value_t = DEFAULT_HTTP_PORT)]
    port: u16,

    /// HTTP server bind address (only used with --transport http)
    #[arg(long, default_value = DEFAULT_HTTP_BIND)]
    bind: String,
}

impl Cli {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            transport: self.transport,
            bind: self.bind.clone(),
            port: self.port,
            debug: self.debug,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout belongs to the stdio transport
    let filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let argocd = ArgoCdConfig::from_raw(&cli.argocd_url, &cli.argocd_token, &cli.insecure)
        .context("Invalid Argo CD configuration")?;
    let server = cli.server_config();
    info!(
        transport = %server.transport,
        url = %argocd.url,
        token = %argocd.redacted_token(),
        insecure = argocd.insecure,
        debug = server.debug,
        "Starting Argo CD MCP server"
    );

    commands::serve_mcp::run(&argocd, &server)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 5] = [
        "argocd-mcp",
        "--argocd-url",
        "https://argocd-server",
        "--argocd-token",
        "secure-token",
    ];

    #[test]
    fn defaults_match_http_on_8080() {
        let cli = Cli::try_parse_from(REQUIRED).unwrap();
        assert_eq!(cli.insecure, "false");
        assert!(!cli.debug);
        assert_eq!(cli.server_config(), ServerConfig::default());
    }

    #[test]
    fn stdio_transport_and_port_flags() {
        let args = REQUIRED
            .iter()
            .copied()
            .chain(["--transport", "stdio", "-p", "9090", "--debug"]);
        let cli = Cli::try_parse_from(args).unwrap();
        let server = cli.server_config();
        assert_eq!(server.transport, Transport::Stdio);
        assert_eq!(server.port, 9090);
        assert!(server.debug);
    }

    #[test]
    fn unknown_transport_is_rejected() {
        let args = REQUIRED.iter().copied().chain(["--transport", "grpc"]);
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn url_and_token_are_required() {
        assert!(Cli::try_parse_from(["argocd-mcp", "--argocd-url", "https://argocd-server"]).is_err());
        assert!(Cli::try_parse_from(["argocd-mcp", "--argocd-token", "secure-token"]).is_err());
    }

    #[test]
    fn environment_references_are_kept_verbatim_until_config_is_built() {
        let cli = Cli::try_parse_from([
            "argocd-mcp",
            "--argocd-url",
            "$ARGOCD_URL",
            "--argocd-token",
            "$ARGOCD_TOKEN",
        ])
        .unwrap();
        assert_eq!(cli.argocd_url, "$ARGOCD_URL");
        assert_eq!(cli.argocd_token, "$ARGOCD_TOKEN");
    }
}
