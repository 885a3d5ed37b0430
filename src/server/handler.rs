//! MCP server handler
//!
//! Implements the MCP protocol handler for the GitLab tool catalog and the
//! two read-only resources (`gitlab://projects`, `gitlab://user`).

use crate::config::AppConfig;
use crate::error::mcp_mapper::{is_protocol_error, map_tool_error};
use crate::gitlab::GitLabClient;
use crate::tools::{ContentBlock, ToolContext, ToolOutput, ToolRegistry};
use rmcp::ErrorData as McpError;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    AnnotateAble, CallToolRequestParam, CallToolResult, Content, ErrorCode, Implementation,
    InitializeResult,
    ListResourcesResult, ListToolsResult, PaginatedRequestParam, RawResource,
    ReadResourceRequestParam, ReadResourceResult, ResourceContents, ResourcesCapability,
    ServerCapabilities, Tool, ToolsCapability,
};
use rmcp::service::{RequestContext, RoleServer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// URI of the accessible-projects resource
const PROJECTS_URI: &str = "gitlab://projects";
/// URI of the authenticated-user resource
const USER_URI: &str = "gitlab://user";

/// GitLab MCP server handler
#[derive(Clone)]
pub struct GitLabMcpHandler {
    /// Server name for MCP
    name: String,
    /// Server version
    version: String,
    /// Tool registry
    registry: Arc<ToolRegistry>,
    /// GitLab client
    gitlab: Arc<GitLabClient>,
}

impl GitLabMcpHandler {
    /// Create a new handler from configuration
    pub fn new(config: &AppConfig, gitlab: GitLabClient) -> Self {
        Self::new_with_shared(config, Arc::new(gitlab))
    }

    /// Create a new handler with a shared (Arc-wrapped) GitLab client
    ///
    /// Useful when creating multiple handlers that share the same client
    /// (e.g., for HTTP transport with multiple concurrent connections).
    pub fn new_with_shared(config: &AppConfig, gitlab: Arc<GitLabClient>) -> Self {
        let registry = ToolRegistry::with_all_tools();

        info!(tools = registry.len(), "Initialized GitLab MCP handler");

        Self {
            name: config.server.name.clone(),
            version: config.server.version.clone(),
            registry: Arc::new(registry),
            gitlab,
        }
    }

    /// Get the number of registered tools
    pub fn tool_count(&self) -> usize {
        self.registry.len()
    }

    /// Create tool context for a request
    fn create_context(&self) -> ToolContext {
        let request_id = format!("{:x}", rand::random::<u64>());
        ToolContext::new(self.gitlab.clone(), request_id)
    }

    /// Convert internal tool output to MCP result
    fn to_mcp_result(&self, output: ToolOutput) -> CallToolResult {
        let content = output
            .content
            .into_iter()
            .map(|block| match block {
                ContentBlock::Text { text } => Content::text(text),
            })
            .collect();

        CallToolResult {
            content,
            is_error: Some(output.is_error),
            meta: None,
            structured_content: None,
        }
    }

    /// Convert registry tools to MCP tool definitions
    fn get_mcp_tools(&self) -> Vec<Tool> {
        self.registry
            .tools()
            .map(|tool| {
                // Convert schemars schema to MCP format (JsonObject = Map<String, Value>)
                let schema_value = serde_json::to_value(&tool.input_schema)
                    .unwrap_or_else(|_| serde_json::json!({}));

                let mut input_schema: Map<String, Value> = Map::new();
                input_schema.insert("type".to_string(), Value::String("object".to_string()));

                if let Some(props) = schema_value.get("properties") {
                    input_schema.insert("properties".to_string(), props.clone());
                }
                if let Some(required) = schema_value.get("required") {
                    input_schema.insert("required".to_string(), required.clone());
                }

                Tool {
                    name: Cow::Borrowed(tool.name),
                    description: Some(Cow::Borrowed(tool.description)),
                    input_schema: Arc::new(input_schema),
                    annotations: None,
                    icons: None,
                    meta: None,
                    output_schema: None,
                    title: None,
                }
            })
            .collect()
    }

    /// Execute a tool call
    async fn execute_tool(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, McpError> {
        let ctx = self.create_context();

        let args = arguments
            .map(Value::Object)
            .unwrap_or_else(|| serde_json::json!({}));

        match self.registry.execute(name, &ctx, args).await {
            Ok(output) => Ok(self.to_mcp_result(output)),
            // Request problems (unknown tool, failed validation) become
            // protocol errors; GitLab/transport failures become tool results
            // so the client can inspect status and body
            Err(e) if is_protocol_error(&e) => {
                debug!(error = %e, "Rejected tool call");
                Err(map_tool_error(&e))
            }
            Err(e) => {
                error!(error = %e, "Tool execution failed");
                Ok(self.to_mcp_result(ToolOutput::error(format!("Error: {}", e))))
            }
        }
    }

    /// Fetch a resource body by URI
    async fn fetch_resource(&self, uri: &str) -> Result<String, McpError> {
        let result = match uri {
            PROJECTS_URI => {
                self.gitlab
                    .get("/projects?membership=true&per_page=20")
                    .await
            }
            USER_URI => self.gitlab.get("/user").await,
            _ => {
                return Err(McpError {
                    code: ErrorCode::INVALID_PARAMS,
                    message: Cow::Owned(format!("Unknown resource: {}", uri)),
                    data: None,
                });
            }
        };

        let value = result.map_err(|e| McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("GitLab API error: {}", e)),
            data: None,
        })?;

        serde_json::to_string_pretty(&value).map_err(|e| McpError {
            code: ErrorCode::INTERNAL_ERROR,
            message: Cow::Owned(format!("Failed to serialize resource: {}", e)),
            data: None,
        })
    }
}

impl ServerHandler for GitLabMcpHandler {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                resources: Some(ResourcesCapability {
                    subscribe: Some(false),
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: self.name.clone(),
                version: self.version.clone(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "GitLab MCP Server - projects, issues, merge requests, files, branches, and commits over the GitLab REST API"
                    .to_string(),
            ),
        }
    }

    #[instrument(skip(self, _context))]
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        debug!("Listing tools");
        async move {
            Ok(ListToolsResult {
                tools: self.get_mcp_tools(),
                next_cursor: None,
            })
        }
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        debug!(?request.arguments, "Calling tool");
        async move { self.execute_tool(&request.name, request.arguments).await }
    }

    /// List the two read-only resources
    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            let mut projects = RawResource::new(PROJECTS_URI, "GitLab Projects".to_string());
            projects.description = Some("List of accessible GitLab projects".to_string());
            projects.mime_type = Some("application/json".to_string());

            let mut user = RawResource::new(USER_URI, "Current User".to_string());
            user.description = Some("Information about the authenticated user".to_string());
            user.mime_type = Some("application/json".to_string());

            Ok(ListResourcesResult {
                resources: vec![projects.no_annotation(), user.no_annotation()],
                next_cursor: None,
            })
        }
    }

    /// Read one of the fixed resources by URI
    #[instrument(skip(self, _context))]
    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        debug!(uri = %request.uri, "Reading resource");
        async move {
            let text = self.fetch_resource(&request.uri).await?;

            Ok(ReadResourceResult {
                contents: vec![ResourceContents::TextResourceContents {
                    uri: request.uri,
                    mime_type: Some("application/json".to_string()),
                    text,
                    meta: None,
                }],
            })
        }
    }
}
