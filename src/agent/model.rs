//! Chat model abstraction and the OpenAI-compatible provider
//!
//! The agent talks to any OpenAI-compatible `/chat/completions` API
//! (OpenAI, OpenRouter, Ollama, ...) through the [`ChatModel`] trait.

use crate::config::AgentConfig;
use crate::error::{AgentError, AgentResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

/// One message in a chat conversation, in OpenAI wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain("assistant", content)
    }

    /// Assistant turn that requests tool calls instead of answering.
    pub fn assistant_tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: None,
            tool_calls: Some(calls),
            tool_call_id: None,
            name: None,
        }
    }

    /// Tool result message answering a specific tool call.
    pub fn tool_result(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(call_id.into()),
            name: Some(tool_name.into()),
        }
    }

    fn plain(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    /// Tool name as exposed to the model
    pub name: String,
    /// Raw JSON arguments string, exactly as the model produced it
    pub arguments: String,
}

/// A tool advertised to the model.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool's parameters
    pub parameters: Value,
}

/// One model turn: either a final answer, tool calls, or both.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

/// Provider-agnostic chat interface the agent runs against.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one completion turn with the given conversation and tools.
    async fn complete(&self, messages: &[ChatMessage], tools: &[ToolSpec])
    -> AgentResult<ChatTurn>;

    /// Run a completion constrained to a JSON schema, returning the
    /// parsed JSON value.
    async fn complete_structured(
        &self,
        messages: &[ChatMessage],
        schema_name: &str,
        schema: &Value,
    ) -> AgentResult<Value>;
}

/// OpenAI-compatible `/chat/completions` client
pub struct OpenAiModel {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiModel {
    pub fn new(config: &AgentConfig) -> AgentResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AgentError::NotConfigured("agent.api_key is not set".to_string()))?;

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(AgentError::Transport)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    fn format_tools(tools: &[ToolSpec]) -> Vec<Value> {
        tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    }
                })
            })
            .collect()
    }

    async fn request(&self, mut body: Value) -> AgentResult<Value> {
        body["model"] = json!(self.model);

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response.json().await?;
        Ok(value)
    }

    fn parse_turn(response: &Value) -> AgentResult<ChatTurn> {
        let message = response["choices"]
            .get(0)
            .map(|c| &c["message"])
            .ok_or_else(|| AgentError::MalformedOutput("response has no choices".to_string()))?;

        let content = message["content"].as_str().map(|s| s.to_string());

        let mut tool_calls = Vec::new();
        if let Some(calls) = message["tool_calls"].as_array() {
            for call in calls {
                let id = call["id"]
                    .as_str()
                    .ok_or_else(|| {
                        AgentError::MalformedOutput("tool call is missing an id".to_string())
                    })?
                    .to_string();
                let function = &call["function"];
                let name = function["name"]
                    .as_str()
                    .ok_or_else(|| {
                        AgentError::MalformedOutput("tool call is missing a name".to_string())
                    })?
                    .to_string();
                let arguments = function["arguments"].as_str().unwrap_or("{}").to_string();
                tool_calls.push(ToolCall {
                    id,
                    name,
                    arguments,
                });
            }
        }

        Ok(ChatTurn {
            content,
            tool_calls,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> AgentResult<ChatTurn> {
        let mut body = json!({ "messages": messages });
        if !tools.is_empty() {
            body["tools"] = json!(Self::format_tools(tools));
        }

        debug!(model = %self.model, messages = messages.len(), "requesting completion");
        let response = self.request(body).await?;
        Self::parse_turn(&response)
    }

    async fn complete_structured(
        &self,
        messages: &[ChatMessage],
        schema_name: &str,
        schema: &Value,
    ) -> AgentResult<Value> {
        let body = json!({
            "messages": messages,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": schema_name,
                    "schema": schema,
                }
            }
        });

        let response = self.request(body).await?;
        let turn = Self::parse_turn(&response)?;

        let content = turn.content.ok_or_else(|| {
            AgentError::MalformedOutput("structured response has no content".to_string())
        })?;

        serde_json::from_str(&content)
            .map_err(|e| AgentError::MalformedOutput(format!("invalid JSON in response: {}", e)))
    }
}
