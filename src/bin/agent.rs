//! GitLab Agent CLI
//!
//! Runs a natural-language instruction against GitLab: an OpenAI-compatible
//! model drives the same tool catalog the MCP server exposes, in process.

use clap::Parser;
use gitlab_mcp::{
    agent::{GitLabAgent, OpenAiModel},
    config::load_config,
    error::ConfigError,
    gitlab::GitLabClient,
    tools::ToolRegistry,
};
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// GitLab Agent - natural-language GitLab operations
#[derive(Parser, Debug)]
#[command(name = "gitlab-agent")]
#[command(version, about, long_about = None)]
struct Args {
    /// Instruction for the agent (e.g. "list open issues in group/project")
    instruction: String,

    /// Thread id to continue an earlier conversation
    #[arg(long)]
    thread: Option<String>,

    /// Emit a structured JSON answer instead of prose
    #[arg(long)]
    structured: bool,

    /// Path to configuration file
    #[arg(short, long, env = "GITLAB_MCP_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GITLAB_MCP_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

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
    let registry = Arc::new(ToolRegistry::with_all_tools());

    let model = OpenAiModel::new(&config.agent)
        .inspect_err(|e| error!(error = %e, "Failed to create model provider"))?;

    let agent = GitLabAgent::new(
        Box::new(model),
        registry,
        gitlab,
        config.agent.max_rounds,
    );

    if args.structured {
        let output = agent
            .invoke_structured(&args.instruction, args.thread.as_deref())
            .await?;
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let answer = agent
            .invoke(&args.instruction, args.thread.as_deref())
            .await?;
        println!("{}", answer);
    }

    Ok(())
}
