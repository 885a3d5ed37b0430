//! GitLab MCP Server
//!
//! A Model Context Protocol server exposing a focused GitLab tool catalog.

use clap::Parser;
use gitlab_mcp::{
    config::{AppConfig, LogFormat, TransportMode, load_config},
    error::ConfigError,
    gitlab::GitLabClient,
    server::GitLabMcpHandler,
    transport::{DEFAULT_HTTP_PORT, HttpConfig, run_http_blocking, run_stdio},
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// GitLab MCP Server - GitLab projects, issues and merge requests via MCP
#[derive(Parser, Debug)]
#[command(name = "gitlab-mcp")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "GITLAB_MCP_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GITLAB_MCP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Transport mode (stdio, http)
    #[arg(long, env = "GITLAB_MCP_TRANSPORT", value_enum)]
    transport: Option<TransportMode>,

    /// HTTP server host (for http transport)
    #[arg(long, env = "GITLAB_MCP_HTTP_HOST", default_value = "127.0.0.1")]
    http_host: String,

    /// HTTP server port (for http transport)
    #[arg(long, env = "GITLAB_MCP_HTTP_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    http_port: u16,
}

fn init_logging(args: &Args, config: &AppConfig) {
    let default_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout belongs to the stdio transport; all logs go to stderr
    match config.logging.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;

    init_logging(&args, &config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting GitLab MCP server"
    );

    if config.gitlab.token.is_none() {
        let err = ConfigError::Missing {
            field: "gitlab.token (or GITLAB_TOKEN)".to_string(),
        };
        error!(error = %err, "No GitLab token configured");
        return Err(err.into());
    }

    let gitlab = Arc::new(
        GitLabClient::new(&config.gitlab)
            .inspect_err(|e| error!(error = %e, "Failed to create GitLab client"))?,
    );

    let transport = args.transport.unwrap_or(config.server.transport);

    match transport {
        TransportMode::Stdio => {
            let handler = GitLabMcpHandler::new_with_shared(&config, gitlab);
            run_stdio(handler).await?;
        }
        TransportMode::Http => {
            let http_config = HttpConfig::from_host_port(&args.http_host, args.http_port)?;
            let config = Arc::new(config);

            run_http_blocking(
                move || GitLabMcpHandler::new_with_shared(&config, gitlab.clone()),
                http_config,
            )
            .await?;
        }
    }

    Ok(())
}
