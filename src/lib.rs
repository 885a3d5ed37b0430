//! GitLab MCP Server
//!
//! A Model Context Protocol server exposing a focused GitLab tool catalog,
//! plus an LLM agent that operates the same tools directly.
//!
//! ## Features
//!
//! - **9 GitLab tools** covering projects, issues, merge requests, branches,
//!   commits, and file contents
//! - **2 resources** - `gitlab://projects` and `gitlab://user`
//! - **Multiple transports** - stdio for editor integrations, HTTP/SSE for
//!   web clients
//! - **Agent mode** - an OpenAI-compatible model driving the tool catalog
//!   from a natural-language instruction
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Example Configuration
//!
//! ```toml
//! [gitlab]
//! url = "https://gitlab.com"
//! # token from GITLAB_TOKEN env var
//!
//! [server]
//! transport = "stdio"
//!
//! [agent]
//! model = "gpt-4o"
//! # api_key from OPENAI_API_KEY env var
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod gitlab;
pub mod server;
pub mod tools;
pub mod transport;
pub mod util;

// Re-export main types
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
pub use server::GitLabMcpHandler;
