//! Repository file tools

use crate::error::ToolError;
use crate::gitlab::GitLabClient;
use crate::tools::{ToolContext, ToolExecutor, ToolInfo, ToolOutput, ToolRegistry};
use async_trait::async_trait;
use base64::Engine;
use schemars::JsonSchema;
use serde::Deserialize;

/// Register all repository tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register::<GetFileContent>();
}

fn default_ref() -> String {
    "main".to_string()
}

/// Get the content of a file from a repository
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetFileContent {
    /// The ID or URL-encoded path of the project
    pub project_id: String,

    /// The path to the file in the repository
    pub file_path: String,

    /// The branch, tag, or commit SHA (default: main)
    #[serde(default = "default_ref")]
    pub r#ref: String,
}

impl ToolInfo for GetFileContent {
    fn name() -> &'static str {
        "get_file_content"
    }
    fn description() -> &'static str {
        "Get the content of a file from a GitLab repository, decoded to plain text"
    }
}

#[async_trait]
impl ToolExecutor for GetFileContent {
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let project = GitLabClient::encode_project(&self.project_id);
        let file_path = urlencoding::encode(&self.file_path);
        let endpoint = format!(
            "/projects/{}/repository/files/{}?ref={}",
            project,
            file_path,
            urlencoding::encode(&self.r#ref)
        );

        let result = ctx.gitlab.get(&endpoint).await?;

        let content = result
            .get("content")
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                ToolError::ExecutionFailed(format!(
                    "No content in GitLab response for '{}'",
                    self.file_path
                ))
            })?;

        // GitLab encodes file content as base64; anything else passes through
        let encoding = result.get("encoding").and_then(|e| e.as_str());
        if encoding != Some("base64") {
            return Ok(ToolOutput::text(content));
        }

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(content)
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to decode base64: {}", e)))?;
        let text = String::from_utf8(decoded)
            .map_err(|e| ToolError::ExecutionFailed(format!("File is not valid UTF-8: {}", e)))?;

        Ok(ToolOutput::text(text))
    }
}
