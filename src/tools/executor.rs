//! Tool execution primitives
//!
//! Defines the traits every tool implements and the context and output types
//! shared by all of them.

use crate::error::ToolError;
use crate::gitlab::GitLabClient;
// async_trait required for dyn-compatibility with boxed tool handlers
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Context handed to every tool invocation.
///
/// Holds the shared GitLab client (the only process-wide state) and a request
/// id for tracing. Nothing here is mutated by tools.
#[derive(Clone)]
pub struct ToolContext {
    /// GitLab API client
    pub gitlab: Arc<GitLabClient>,
    /// Request id for log correlation
    pub request_id: String,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(gitlab: Arc<GitLabClient>, request_id: impl Into<String>) -> Self {
        Self {
            gitlab,
            request_id: request_id.into(),
        }
    }
}

/// Static tool metadata
pub trait ToolInfo {
    /// Tool name as exposed over MCP
    fn name() -> &'static str;
    /// Tool description for MCP clients
    fn description() -> &'static str;
}

/// A tool that can be executed against a context
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute the tool
    async fn execute(&self, ctx: &ToolContext) -> Result<ToolOutput, ToolError>;
}

/// A block of content returned by a tool
#[derive(Debug, Clone)]
pub enum ContentBlock {
    /// Plain text (including serialized JSON)
    Text { text: String },
}

/// The result of a tool execution
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Content blocks to return to the client
    pub content: Vec<ContentBlock>,
    /// Whether this output represents an execution error
    pub is_error: bool,
}

impl ToolOutput {
    /// Create a plain text output
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Create an output from a JSON value, pretty-printed
    pub fn json_value(value: Value) -> Result<Self, ToolError> {
        let text = serde_json::to_string_pretty(&value)?;
        Ok(Self::text(text))
    }

    /// Create an error output
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// The concatenated text of all content blocks
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|b| match b {
                ContentBlock::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
