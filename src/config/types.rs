//! Configuration types for gitlab-mcp
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitLab connection settings
    pub gitlab: GitLabConfig,

    /// Server/transport settings
    pub server: ServerConfig,

    /// Agent (chat model) settings
    pub agent: AgentConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// GitLab connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitLabConfig {
    /// GitLab instance URL (e.g., `https://gitlab.com`)
    pub url: String,

    /// Personal Access Token (prefer env var GITLAB_TOKEN)
    #[serde(default)]
    pub token: Option<String>,

    /// API version (default: "v4")
    pub api_version: String,

    /// Request timeout in seconds, passed through to the HTTP client
    pub timeout_secs: u64,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            url: "https://gitlab.com".to_string(),
            token: None,
            api_version: "v4".to_string(),
            timeout_secs: 30,
        }
    }
}

impl GitLabConfig {
    /// Get the full API base URL
    pub fn api_url(&self) -> String {
        format!(
            "{}/api/{}",
            self.url.trim_end_matches('/'),
            self.api_version
        )
    }
}

/// Server/transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Transport mode
    pub transport: TransportMode,

    /// HTTP host (for http/sse transport)
    pub host: String,

    /// HTTP port (for http/sse transport)
    pub port: u16,

    /// Server name for MCP
    pub name: String,

    /// Server version for MCP
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: TransportMode::Stdio,
            host: "127.0.0.1".to_string(),
            port: 20289,
            name: "gitlab-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Transport mode selection
///
/// Doubles as the clap value enum for `--transport`, so an unknown mode on
/// the command line is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Standard input/output (default, for MCP clients spawning a subprocess)
    #[default]
    Stdio,
    /// HTTP with Server-Sent Events
    Http,
}

/// Agent (chat model) configuration
///
/// Only the `gitlab-agent` binary requires these; the MCP server ignores them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// API key for the model provider (prefer env var OPENAI_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    pub base_url: String,

    /// Model name
    pub model: String,

    /// Maximum model turns per invocation before giving up
    pub max_rounds: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            max_rounds: 8,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gitlab_config_api_url() {
        let config = GitLabConfig {
            url: "https://gitlab.example.com".to_string(),
            api_version: "v4".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_url(), "https://gitlab.example.com/api/v4");

        // Trailing slash must not double up
        let config = GitLabConfig {
            url: "https://gitlab.example.com/".to_string(),
            api_version: "v4".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_url(), "https://gitlab.example.com/api/v4");
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.gitlab.url, "https://gitlab.com");
        assert_eq!(config.gitlab.timeout_secs, 30);
        assert_eq!(config.server.transport, TransportMode::Stdio);
        assert_eq!(config.agent.base_url, "https://api.openai.com/v1");
        assert!(config.agent.api_key.is_none());
    }

    #[test]
    fn test_deserialize_transport_mode() {
        let mode: TransportMode = serde_json::from_str(r#""stdio""#).unwrap();
        assert_eq!(mode, TransportMode::Stdio);

        let mode: TransportMode = serde_json::from_str(r#""http""#).unwrap();
        assert_eq!(mode, TransportMode::Http);
    }
}
