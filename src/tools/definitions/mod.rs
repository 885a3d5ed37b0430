//! Tool definitions
//!
//! The fixed catalog of GitLab operations exposed over MCP. Each tool is a
//! 1:1 mapping to a GitLab REST endpoint; responses pass through unmodified
//! except for `get_file_content`, which decodes base64 file content.

pub mod branches;
pub mod commits;
pub mod issues;
pub mod merge_requests;
pub mod projects;
pub mod repository;

use crate::tools::ToolRegistry;

/// Register all tools with the registry
pub fn register_all_tools(registry: &mut ToolRegistry) {
    projects::register(registry);
    issues::register(registry);
    merge_requests::register(registry);
    repository::register(registry);
    branches::register(registry);
    commits::register(registry);
}
