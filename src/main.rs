//! GitLab Gateway
//!
//! Entry point: loads configuration, builds the GitLab client once and
//! serves MCP over the selected transport.

use clap::Parser;
use gitlab_gateway::{
    auth::create_auth_provider,
    config::{AppConfig, LogFormat, TransportMode, load_config},
    gitlab::GitLabClient,
    server::GatewayHandler,
    transport::{HttpConfig, run_http_blocking, run_stdio},
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// GitLab Gateway - GitLab operations as MCP tools
#[derive(Parser, Debug)]
#[command(name = "gitlab-gateway")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "GITLAB_GATEWAY_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GITLAB_GATEWAY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Transport mode (stdio, http)
    #[arg(long, env = "GITLAB_GATEWAY_TRANSPORT")]
    transport: Option<String>,

    /// HTTP server host (for http transport)
    #[arg(long, env = "GITLAB_GATEWAY_HTTP_HOST")]
    http_host: Option<String>,

    /// HTTP server port (for http transport)
    #[arg(long, env = "GITLAB_GATEWAY_HTTP_PORT")]
    http_port: Option<u16>,

    /// Refuse tools that modify GitLab
    #[arg(long, env = "GITLAB_GATEWAY_READ_ONLY")]
    read_only: bool,
}

/// Install the tracing subscriber; all output goes to stderr
fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

/// Fold command-line overrides into the loaded configuration
fn apply_args(config: &mut AppConfig, args: &Args) -> anyhow::Result<()> {
    if let Some(transport) = &args.transport {
        config.server.transport = TransportMode::try_parse(transport)
            .ok_or_else(|| anyhow::anyhow!("Unknown transport: {} (use stdio or http)", transport))?;
    }
    if let Some(host) = &args.http_host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.http_port {
        config.server.port = port;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.read_only {
        config.server.read_only = true;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            // Logging is not set up yet
            init_logging(
                args.log_level.as_deref().unwrap_or("info"),
                LogFormat::Pretty,
            );
            error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };
    apply_args(&mut config, &args)?;

    init_logging(&config.logging.level, config.logging.format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        gitlab = %config.gitlab.url,
        read_only = config.server.read_only,
        "Starting GitLab gateway"
    );

    let auth = create_auth_provider(&config.gitlab)
        .inspect_err(|e| error!(error = %e, "Failed to create auth provider"))?;

    let gitlab = Arc::new(
        GitLabClient::new(&config.gitlab, auth)
            .inspect_err(|e| error!(error = %e, "Failed to create GitLab client"))?,
    );

    match config.server.transport {
        TransportMode::Stdio => {
            let handler = GatewayHandler::new_with_shared(&config, gitlab);
            run_stdio(handler).await?;
        }
        TransportMode::Http => {
            let http_config = HttpConfig::from_host_port(&config.server.host, config.server.port)?;
            let config = Arc::new(config);

            run_http_blocking(
                move || GatewayHandler::new_with_shared(&config, gitlab.clone()),
                http_config,
            )
            .await?;
        }
    }

    Ok(())
}
