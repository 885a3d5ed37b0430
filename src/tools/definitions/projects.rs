//! Project tools

use crate::error::ToolError;
use crate::gitlab::GitLabClient;
use crate::tools::{ToolContext, ToolExecutor, ToolInfo, ToolOutput, ToolRegistry};
use crate::util::QueryBuilder;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

/// Register all project tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<ListProjects>();
    registry.register::<GetProject>();
}

// ============================================================================
// list_projects
// ============================================================================

fn default_per_page() -> u32 {
    20
}

/// List projects the current user is a member of
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListProjects {
    /// Number of projects to return (default: 20, max: 100)
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl ToolInfo for ListProjects {
    fn name() -> &'static str {
        "list_projects"
    }
    fn description() -> &'static str {
        "List all GitLab projects accessible to the current user"
    }
}

#[async_trait]
impl ToolExecutor for ListProjects {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let query = QueryBuilder::new()
            .param("membership", true)
            .param("per_page", self.per_page)
            .build();

        let endpoint = format!("/projects{}", query);
        let result = ctx.gitlab.get(&endpoint).await?;
        ToolOutput::json_value(result)
    }
}

// ============================================================================
// get_project
// ============================================================================

/// Get details about a specific project
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetProject {
    /// The ID or URL-encoded path of the project
    pub project_id: String,
}

impl ToolInfo for GetProject {
    fn name() -> &'static str {
        "get_project"
    }
    fn description() -> &'static str {
        "Get details about a specific GitLab project"
    }
}

#[async_trait]
impl ToolExecutor for GetProject {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let project = GitLabClient::encode_project(&self.project_id);
        let endpoint = format!("/projects/{}", project);

        let result = ctx.gitlab.get(&endpoint).await?;
        ToolOutput::json_value(result)
    }
}
