//! Issue tools

use crate::error::ToolError;
use crate::gitlab::GitLabClient;
use crate::tools::{ToolContext, ToolExecutor, ToolInfo, ToolOutput, ToolRegistry};
use crate::util::QueryBuilder;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

/// Register all issue tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<ListIssues>();
    registry.register::<CreateIssue>();
}

// ============================================================================
// list_issues
// ============================================================================

/// List issues in a project, optionally filtered by state
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListIssues {
    /// The ID or URL-encoded path of the project
    pub project_id: String,

    /// Filter by state: opened, closed, or all
    #[serde(default)]
    pub state: Option<String>,
}

impl ToolInfo for ListIssues {
    fn name() -> &'static str {
        "list_issues"
    }
    fn description() -> &'static str {
        "List issues in a GitLab project, optionally filtered by state (opened, closed, or all)"
    }
}

#[async_trait]
impl ToolExecutor for ListIssues {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let project = GitLabClient::encode_project(&self.project_id);
        // No state supplied means no state parameter; GitLab's default applies
        let query = QueryBuilder::new()
            .optional("state", self.state.as_ref())
            .build();

        let endpoint = format!("/projects/{}/issues{}", project, query);
        let result = ctx.gitlab.get(&endpoint).await?;
        ToolOutput::json_value(result)
    }
}

// ============================================================================
// create_issue
// ============================================================================

/// Create a new issue in a project
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateIssue {
    /// The ID or URL-encoded path of the project
    pub project_id: String,

    /// The title of the issue
    pub title: String,

    /// The description of the issue
    #[serde(default)]
    pub description: Option<String>,

    /// Comma-separated list of label names
    #[serde(default)]
    pub labels: Option<String>,
}

impl ToolInfo for CreateIssue {
    fn name() -> &'static str {
        "create_issue"
    }
    fn description() -> &'static str {
        "Create a new issue in a GitLab project"
    }
}

#[async_trait]
impl ToolExecutor for CreateIssue {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let project = GitLabClient::encode_project(&self.project_id);
        let endpoint = format!("/projects/{}/issues", project);

        let mut body = json!({
            "title": self.title,
        });
        if let Some(ref description) = self.description {
            body["description"] = json!(description);
        }
        if let Some(ref labels) = self.labels {
            body["labels"] = json!(split_labels(labels));
        }

        let result = ctx.gitlab.post(&endpoint, &body).await?;
        ToolOutput::json_value(result)
    }
}

/// Split a comma-separated label string into a list.
///
/// Entries are trimmed; empty entries are dropped.
fn split_labels(labels: &str) -> Vec<String> {
    labels
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
