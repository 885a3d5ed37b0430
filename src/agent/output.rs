//! Structured agent output

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Final structured answer the agent can be asked to produce.
///
/// Returned by [`GitLabAgent::invoke_structured`] when the caller wants
/// a machine-readable result instead of free-form prose.
///
/// [`GitLabAgent::invoke_structured`]: crate::agent::GitLabAgent::invoke_structured
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AgentOutput {
    /// Human-readable summary of what was done or found
    pub user_output: String,
    /// Short description of the action taken, if any (e.g. "created issue #42")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_taken: Option<String>,
    /// URL of the GitLab resource involved, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_url: Option<String>,
    /// Key insights or analysis drawn from the response, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights_summary: Option<String>,
}
