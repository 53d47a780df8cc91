//! Execution plans, actions and their outcomes.

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::tool::ToolOutput;

/// Tool name of the deterministic "apply stylesheet" action.
///
/// This is the frozen form every resolved generative action is rewritten to.
pub const APPLY_CSS_TOOL: &str = "applyCSS";

fn empty_parameters() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// One tool invocation with concrete parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub tool: String,

    #[serde(default = "empty_parameters")]
    pub parameters: serde_json::Value,

    /// Planner's note for this step. Diagnostic only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl Action {
    pub fn new(tool: impl Into<String>, parameters: serde_json::Value) -> Self {
        Self {
            tool: tool.into(),
            parameters,
            reasoning: None,
        }
    }

    /// The frozen, directly replayable stylesheet action.
    pub fn apply_css(css: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            APPLY_CSS_TOOL,
            serde_json::json!({
                "css": css.into(),
                "description": description.into(),
            }),
        )
    }

    /// Whether this action is already in frozen stylesheet form.
    pub fn is_frozen(&self) -> bool {
        self.tool == APPLY_CSS_TOOL
    }

    /// String parameter lookup, ignoring empty values.
    pub fn str_param(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(name)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Ordered list of actions produced by planning or reconstructed for replay.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutionPlan {
    /// Free text. Diagnostic only.
    #[serde(default)]
    pub reasoning: String,

    #[serde(default)]
    pub actions: Vec<Action>,
}

impl ExecutionPlan {
    pub fn new(reasoning: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            reasoning: reasoning.into(),
            actions,
        }
    }

    /// A plan with no actions, explaining why.
    pub fn empty(reasoning: impl Into<String>) -> Self {
        Self::new(reasoning, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Result of executing one action, positionally aligned with its plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub tool: String,

    #[serde(default = "empty_parameters", alias = "params")]
    pub parameters: serde_json::Value,

    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ToolOutput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionOutcome {
    pub fn succeeded(action: &Action, output: ToolOutput) -> Self {
        Self {
            tool: action.tool.clone(),
            parameters: action.parameters.clone(),
            success: true,
            result: Some(output),
            error: None,
        }
    }

    pub fn failed(action: &Action, error: &DispatchError) -> Self {
        Self {
            tool: action.tool.clone(),
            parameters: action.parameters.clone(),
            success: false,
            result: None,
            error: Some(error.to_string()),
        }
    }

    /// The resolved stylesheet of a successful outcome.
    pub fn css_text(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.result.as_ref().and_then(ToolOutput::css_text)
    }
}

/// Result of a natural-language command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    /// The plan that actually ran in this session.
    pub execution_plan: ExecutionPlan,

    pub results: Vec<ActionOutcome>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Whether a rule was stored for the origin.
    #[serde(default)]
    pub persisted: bool,
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
