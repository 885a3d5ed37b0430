//! Error types for gitlab-mcp
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors that are part of the API,
//! and convert to appropriate MCP error responses at the boundary.

pub mod mcp_mapper;

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("GitLab API error: {0}")]
    GitLab(#[from] GitLabError),

    #[error("Tool execution error: {0}")]
    Tool(#[from] ToolError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// GitLab API specific errors
///
/// Distinguishes "GitLab rejected the request" (`Upstream`, status and body
/// preserved for the caller to inspect) from "the HTTP call never completed"
/// (`Transport`). No retry or suppression happens at this layer.
#[derive(Error, Debug)]
pub enum GitLabError {
    #[error("GitLab request could not complete: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitLab returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid response from GitLab: {0}")]
    InvalidResponse(String),
}

impl GitLabError {
    /// Create an upstream error from a non-success status and response body
    pub fn from_response(status: u16, body: &str) -> Self {
        GitLabError::Upstream {
            status,
            body: if body.is_empty() {
                format!("HTTP {}", status)
            } else {
                body.to_string()
            },
        }
    }

    /// The upstream status code, if GitLab answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            GitLabError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Tool execution errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    Validation(String),

    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    #[error("GitLab API error: {0}")]
    GitLab(#[from] GitLabError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tool not found: {0}")]
    NotFound(String),
}

/// Agent wrapper errors
///
/// The reasoning itself lives in the model provider; these only classify how
/// a provider call went wrong. They propagate unretried.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Model request could not complete: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Model provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Malformed model output: {0}")]
    MalformedOutput(String),

    #[error("Agent configuration error: {0}")]
    NotConfigured(String),

    #[error("Agent stopped after {0} tool rounds without a final answer")]
    MaxRoundsExceeded(u32),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for tool operations
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Result type alias for GitLab API operations
pub type GitLabResult<T> = std::result::Result<T, GitLabError>;

/// Result type alias for agent operations
pub type AgentResult<T> = std::result::Result<T, AgentError>;
