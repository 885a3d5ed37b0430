//! Agent module
//!
//! Wraps the tool catalog in an LLM-driven agent: the model receives
//! the tool specs, requests calls, and the runner executes them against
//! GitLab until the model produces a final answer.

pub mod model;
pub mod output;
pub mod runner;

pub use model::{ChatMessage, ChatModel, ChatTurn, OpenAiModel, ToolCall, ToolSpec};
pub use output::AgentOutput;
pub use runner::GitLabAgent;
