//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (GITLAB_MCP_*, plus the conventional GITLAB_* /
//!    OPENAI_API_KEY overrides)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "gitlab-mcp.toml",
    ".gitlab-mcp.toml",
    "~/.config/gitlab-mcp/config.toml",
    "/etc/gitlab-mcp/config.toml",
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Defaults are handled by serde defaults on AppConfig

    // 2. Add configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. Add environment variables with GITLAB_MCP_ prefix
    // e.g., GITLAB_MCP_GITLAB__URL, GITLAB_MCP_SERVER__PORT
    // Double underscore (__) maps to nested keys (gitlab.url)
    builder = builder.add_source(
        Environment::with_prefix("GITLAB_MCP")
            .separator("__")
            .try_parsing(true),
    );

    // 4. Handle common GitLab token environment variables,
    // in order of precedence
    for env_var in &[
        "GITLAB_TOKEN",
        "GITLAB_PRIVATE_TOKEN",
        "GITLAB_ACCESS_TOKEN",
    ] {
        if let Ok(token) = std::env::var(env_var)
            && !token.is_empty()
        {
            builder = builder
                .set_override("gitlab.token", token)
                .map_err(|e| ConfigError::Load(e.to_string()))?;
            break;
        }
    }

    // 5. Handle GITLAB_URL if set (common convention)
    if let Ok(url) = std::env::var("GITLAB_URL") {
        builder = builder
            .set_override("gitlab.url", url)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    // 6. Model provider key for the agent binary
    if let Ok(key) = std::env::var("OPENAI_API_KEY")
        && !key.is_empty()
    {
        builder = builder
            .set_override("agent.api_key", key)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    // Build and deserialize
    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
///
/// Token presence is not checked here; the server binary requires it, the
/// agent binary requires an API key, and each checks its own at startup.
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.gitlab.url.is_empty() {
        return Err(ConfigError::Missing {
            field: "gitlab.url".to_string(),
        });
    }

    if !config.gitlab.url.starts_with("http://") && !config.gitlab.url.starts_with("https://") {
        return Err(ConfigError::Invalid {
            message: format!(
                "gitlab.url must start with http:// or https://, got: {}",
                config.gitlab.url
            ),
        });
    }

    if config.gitlab.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "gitlab.timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.server.port == 0 {
        return Err(ConfigError::Invalid {
            message: "server.port must be greater than 0".to_string(),
        });
    }

    if config.agent.max_rounds == 0 {
        return Err(ConfigError::Invalid {
            message: "agent.max_rounds must be greater than 0".to_string(),
        });
    }

    Ok(())
}
