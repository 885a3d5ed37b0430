//! Commit tools

use crate::error::ToolError;
use crate::gitlab::GitLabClient;
use crate::tools::{ToolContext, ToolExecutor, ToolInfo, ToolOutput, ToolRegistry};
use crate::util::QueryBuilder;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

/// Register all commit tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<ListCommits>();
}

/// List commits in a project, optionally filtered by ref
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListCommits {
    /// The ID or URL-encoded path of the project
    pub project_id: String,

    /// The name of a branch, tag, or commit SHA
    #[serde(default)]
    pub ref_name: Option<String>,
}

impl ToolInfo for ListCommits {
    fn name() -> &'static str {
        "list_commits"
    }
    fn description() -> &'static str {
        "List commits in a GitLab project, optionally filtered by branch, tag, or commit SHA"
    }
}

#[async_trait]
impl ToolExecutor for ListCommits {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let project = GitLabClient::encode_project(&self.project_id);
        let query = QueryBuilder::new()
            .optional("ref_name", self.ref_name.as_ref())
            .build();

        let endpoint = format!("/projects/{}/repository/commits{}", project, query);
        let result = ctx.gitlab.get(&endpoint).await?;
        ToolOutput::json_value(result)
    }
}
