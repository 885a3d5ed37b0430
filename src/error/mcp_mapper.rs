//! MCP error code mapping.
//!
//! Maps application errors to MCP protocol errors with appropriate JSON-RPC
//! error codes.
//!
//! # Strategy
//! - Protocol-level errors (tool not found, invalid params) → `Err(McpError)`
//! - Tool execution errors → `Ok(CallToolResult { is_error: true })`
//!
//! This distinction allows MCP clients to differentiate between:
//! - Problems with the request itself (protocol errors)
//! - Problems during tool execution (tool errors)

use rmcp::ErrorData as McpError;
use rmcp::model::ErrorCode;
use serde_json::json;
use std::borrow::Cow;

use super::{GitLabError, ToolError};

/// Maps a `ToolError` to an MCP protocol error.
///
/// Use this for errors that should be returned as `Err(McpError)` rather than
/// `Ok(CallToolResult { is_error: true })`: an unknown tool name or arguments
/// that failed validation never reach GitLab, so they are request problems.
pub fn map_tool_error(error: &ToolError) -> McpError {
    match error {
        ToolError::NotFound(name) => McpError {
            code: ErrorCode::METHOD_NOT_FOUND,
            message: Cow::Owned(format!("Tool '{}' not found", name)),
            data: Some(json!({
                "tool": name,
                "error_type": "ToolNotFound"
            })),
        },

        ToolError::Validation(msg) => McpError {
            code: ErrorCode::INVALID_PARAMS,
            message: Cow::Owned(msg.clone()),
            data: Some(json!({
                "error_type": "ValidationError"
            })),
        },

        ToolError::Serialization(e) => McpError {
            code: ErrorCode::INVALID_PARAMS,
            message: Cow::Owned(format!("Invalid argument format: {}", e)),
            data: Some(json!({
                "error_type": "SerializationError"
            })),
        },

        ToolError::ExecutionFailed(msg) => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(msg.clone()),
            data: Some(json!({
                "error_type": "ExecutionFailed"
            })),
        },

        ToolError::GitLab(gitlab_err) => map_gitlab_error(gitlab_err),
    }
}

/// Maps a `GitLabError` to an MCP protocol error.
pub fn map_gitlab_error(error: &GitLabError) -> McpError {
    match error {
        GitLabError::Upstream { status, body } => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("GitLab returned HTTP {}", status)),
            data: Some(json!({
                "error_type": "UpstreamError",
                "status": status,
                "body": body,
            })),
        },

        GitLabError::Transport(e) => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("GitLab request could not complete: {}", e)),
            data: Some(json!({
                "error_type": "TransportError"
            })),
        },

        GitLabError::InvalidResponse(msg) => McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("Invalid response from GitLab: {}", msg)),
            data: Some(json!({
                "error_type": "InvalidResponse"
            })),
        },
    }
}

/// Whether an error is a request problem that should become a protocol error
/// instead of a tool result with `is_error: true`.
pub fn is_protocol_error(error: &ToolError) -> bool {
    matches!(
        error,
        ToolError::NotFound(_) | ToolError::Validation(_) | ToolError::Serialization(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_method_not_found() {
        let err = map_tool_error(&ToolError::NotFound("bogus_tool".into()));
        assert_eq!(err.code, ErrorCode::METHOD_NOT_FOUND);
        assert!(err.message.contains("bogus_tool"));
    }

    #[test]
    fn test_validation_maps_to_invalid_params() {
        let err = map_tool_error(&ToolError::Validation("missing field `project_id`".into()));
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        let data = err.data.unwrap();
        assert_eq!(data["error_type"], "ValidationError");
    }

    #[test]
    fn test_upstream_preserves_status_and_body() {
        let gitlab = GitLabError::Upstream {
            status: 404,
            body: "{\"message\":\"404 Project Not Found\"}".into(),
        };
        let err = map_tool_error(&ToolError::GitLab(gitlab));
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        let data = err.data.unwrap();
        assert_eq!(data["status"], 404);
        assert!(data["body"].as_str().unwrap().contains("Not Found"));
    }

    #[test]
    fn test_protocol_error_classification() {
        assert!(is_protocol_error(&ToolError::NotFound("x".into())));
        assert!(is_protocol_error(&ToolError::Validation("x".into())));
        assert!(!is_protocol_error(&ToolError::ExecutionFailed("x".into())));
        assert!(!is_protocol_error(&ToolError::GitLab(
            GitLabError::InvalidResponse("x".into())
        )));
    }
}
