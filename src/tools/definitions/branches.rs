//! Branch tools

use crate::error::ToolError;
use crate::gitlab::GitLabClient;
use crate::tools::{ToolContext, ToolExecutor, ToolInfo, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

/// Register all branch tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<ListBranches>();
}

/// List branches in a project
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListBranches {
    /// The ID or URL-encoded path of the project
    pub project_id: String,
}

impl ToolInfo for ListBranches {
    fn name() -> &'static str {
        "list_branches"
    }
    fn description() -> &'static str {
        "List branches in a GitLab project"
    }
}

#[async_trait]
impl ToolExecutor for ListBranches {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let project = GitLabClient::encode_project(&self.project_id);
        let endpoint = format!("/projects/{}/repository/branches", project);

        let result = ctx.gitlab.get(&endpoint).await?;
        ToolOutput::json_value(result)
    }
}
