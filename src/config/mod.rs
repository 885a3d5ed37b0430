//! Configuration module
//!
//! Layered configuration for the server and agent binaries.

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_from_str};
pub use types::{AgentConfig, AppConfig, GitLabConfig, LogFormat, ServerConfig, TransportMode};
