//! Merge request tools

use crate::error::ToolError;
use crate::gitlab::GitLabClient;
use crate::tools::{ToolContext, ToolExecutor, ToolInfo, ToolOutput, ToolRegistry};
use crate::util::QueryBuilder;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

/// Register all merge request tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<ListMergeRequests>();
    registry.register::<CreateMergeRequest>();
}

// ============================================================================
// list_merge_requests
// ============================================================================

/// List merge requests in a project, optionally filtered by state
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListMergeRequests {
    /// The ID or URL-encoded path of the project
    pub project_id: String,

    /// Filter by state: opened, closed, merged, or all
    #[serde(default)]
    pub state: Option<String>,
}

impl ToolInfo for ListMergeRequests {
    fn name() -> &'static str {
        "list_merge_requests"
    }
    fn description() -> &'static str {
        "List merge requests in a GitLab project, optionally filtered by state (opened, closed, merged, or all)"
    }
}

#[async_trait]
impl ToolExecutor for ListMergeRequests {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let project = GitLabClient::encode_project(&self.project_id);
        let query = QueryBuilder::new()
            .optional("state", self.state.as_ref())
            .build();

        let endpoint = format!("/projects/{}/merge_requests{}", project, query);
        let result = ctx.gitlab.get(&endpoint).await?;
        ToolOutput::json_value(result)
    }
}

// ============================================================================
// create_merge_request
// ============================================================================

/// Create a new merge request in a project
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateMergeRequest {
    /// The ID or URL-encoded path of the project
    pub project_id: String,

    /// The source branch name
    pub source_branch: String,

    /// The target branch name
    pub target_branch: String,

    /// The title of the merge request
    pub title: String,

    /// The description of the merge request
    #[serde(default)]
    pub description: Option<String>,
}

impl ToolInfo for CreateMergeRequest {
    fn name() -> &'static str {
        "create_merge_request"
    }
    fn description() -> &'static str {
        "Create a new merge request in a GitLab project"
    }
}

#[async_trait]
impl ToolExecutor for CreateMergeRequest {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let project = GitLabClient::encode_project(&self.project_id);
        let endpoint = format!("/projects/{}/merge_requests", project);

        // Only supplied fields go on the wire; no description key when none
        // was given
        let mut body = json!({
            "source_branch": self.source_branch,
            "target_branch": self.target_branch,
            "title": self.title,
        });
        if let Some(ref description) = self.description {
            body["description"] = json!(description);
        }

        let result = ctx.gitlab.post(&endpoint, &body).await?;
        ToolOutput::json_value(result)
    }
}
