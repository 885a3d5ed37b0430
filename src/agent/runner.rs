//! Agent tool-call loop
//!
//! Drives a chat model against the GitLab tool registry: the model
//! requests tool calls, the runner executes them in process and feeds
//! the results back, until the model produces a final answer or the
//! round limit is hit.

use crate::agent::model::{ChatMessage, ChatModel, ToolCall, ToolSpec};
use crate::agent::output::AgentOutput;
use crate::error::{AgentError, AgentResult, ToolError};
use crate::gitlab::GitLabClient;
use crate::tools::{ToolContext, ToolRegistry};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const SYSTEM_PROMPT: &str = "You are a GitLab assistant. You can inspect projects, \
issues, merge requests, branches, commits and file contents, and you can create \
issues and merge requests. Use the available tools to answer the user's request. \
When you create or change something, mention what you did and include the web URL \
of the affected resource if the tool result contains one. Answer concisely.";

/// LLM agent operating the GitLab tool catalog.
///
/// Conversations are kept per thread id so follow-up instructions can
/// refer to earlier turns.
pub struct GitLabAgent {
    model: Box<dyn ChatModel>,
    registry: Arc<ToolRegistry>,
    gitlab: Arc<GitLabClient>,
    max_rounds: u32,
    threads: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl GitLabAgent {
    pub fn new(
        model: Box<dyn ChatModel>,
        registry: Arc<ToolRegistry>,
        gitlab: Arc<GitLabClient>,
        max_rounds: u32,
    ) -> Self {
        Self {
            model,
            registry,
            gitlab,
            max_rounds,
            threads: Mutex::new(HashMap::new()),
        }
    }

    /// Tool specs for the model, derived from the registry schemas.
    fn tool_specs(&self) -> Vec<ToolSpec> {
        self.registry
            .tools()
            .map(|tool| {
                let parameters = serde_json::to_value(&tool.input_schema)
                    .unwrap_or_else(|_| json!({"type": "object"}));
                ToolSpec {
                    name: tool.name.to_string(),
                    description: tool.description.to_string(),
                    parameters,
                }
            })
            .collect()
    }

    /// Run one instruction to completion and return the model's answer.
    pub async fn invoke(
        &self,
        instruction: &str,
        thread_id: Option<&str>,
    ) -> AgentResult<String> {
        let mut messages = self.load_thread(thread_id).await;
        messages.push(ChatMessage::user(instruction));

        let answer = self.run_loop(&mut messages).await?;

        self.store_thread(thread_id, messages).await;
        Ok(answer)
    }

    /// Like [`invoke`], but coerce the final answer into [`AgentOutput`].
    ///
    /// [`invoke`]: GitLabAgent::invoke
    pub async fn invoke_structured(
        &self,
        instruction: &str,
        thread_id: Option<&str>,
    ) -> AgentResult<AgentOutput> {
        let mut messages = self.load_thread(thread_id).await;
        messages.push(ChatMessage::user(instruction));

        self.run_loop(&mut messages).await?;
        self.store_thread(thread_id, messages.clone()).await;

        // Separate structured-output turn so tool calling and schema
        // enforcement never mix in a single request.
        let schema = serde_json::to_value(schemars::schema_for!(AgentOutput))
            .map_err(|e| AgentError::MalformedOutput(e.to_string()))?;
        messages.push(ChatMessage::user(
            "Summarize the result of this conversation as JSON matching the requested schema.",
        ));

        let value = self
            .model
            .complete_structured(&messages, "agent_output", &schema)
            .await?;

        serde_json::from_value(value)
            .map_err(|e| AgentError::MalformedOutput(format!("output does not match schema: {}", e)))
    }

    async fn run_loop(&self, messages: &mut Vec<ChatMessage>) -> AgentResult<String> {
        let tools = self.tool_specs();

        for round in 1..=self.max_rounds {
            debug!(round, max = self.max_rounds, "agent round");

            let turn = self.model.complete(messages, &tools).await?;

            if turn.tool_calls.is_empty() {
                let answer = turn.content.unwrap_or_default();
                messages.push(ChatMessage::assistant(answer.clone()));
                return Ok(answer);
            }

            messages.push(ChatMessage::assistant_tool_calls(turn.tool_calls.clone()));

            for call in &turn.tool_calls {
                let result = self.execute_call(call).await;
                messages.push(ChatMessage::tool_result(&call.id, &call.name, result));
            }
        }

        warn!(max = self.max_rounds, "agent hit round limit");
        Err(AgentError::MaxRoundsExceeded(self.max_rounds))
    }

    /// Execute one tool call and render the outcome as a tool message.
    ///
    /// Tool failures are reported back to the model as text rather than
    /// aborting the loop, so it can recover or explain the failure.
    async fn execute_call(&self, call: &ToolCall) -> String {
        info!(tool = %call.name, "agent tool call");

        let args: Value = match serde_json::from_str(&call.arguments) {
            Ok(v) => v,
            Err(e) => {
                return json!({"error": format!("invalid tool arguments: {}", e)}).to_string();
            }
        };

        let ctx = ToolContext::new(self.gitlab.clone(), call.id.clone());
        match self.registry.execute(&call.name, &ctx, args).await {
            Ok(output) => output.text_content(),
            Err(ToolError::NotFound(name)) => {
                json!({"error": format!("unknown tool: {}", name)}).to_string()
            }
            Err(e) => json!({"error": e.to_string()}).to_string(),
        }
    }

    async fn load_thread(&self, thread_id: Option<&str>) -> Vec<ChatMessage> {
        if let Some(id) = thread_id {
            let threads = self.threads.lock().await;
            if let Some(history) = threads.get(id) {
                return history.clone();
            }
        }
        vec![ChatMessage::system(SYSTEM_PROMPT)]
    }

    async fn store_thread(&self, thread_id: Option<&str>, messages: Vec<ChatMessage>) {
        if let Some(id) = thread_id {
            let mut threads = self.threads.lock().await;
            threads.insert(id.to_string(), messages);
        }
    }
}
