//! Persisted customization rules.

use serde::{Deserialize, Serialize};

use crate::plan::{ActionOutcome, ExecutionPlan};

/// A persisted record pairing a command with a replayable plan.
///
/// Rules are immutable once created: they are only superseded or evicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// The natural-language command that created the rule.
    pub command: String,

    /// The storage plan, with resolved generative actions frozen to `applyCSS`.
    pub execution_plan: ExecutionPlan,

    /// Outcomes of the session that created the rule.
    ///
    /// `None` means no outcomes were recorded, which replay treats as effective.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ActionOutcome>>,

    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Rule {
    /// Create a rule stamped with the current time.
    pub fn new(
        command: impl Into<String>,
        execution_plan: ExecutionPlan,
        results: Vec<ActionOutcome>,
    ) -> Self {
        Self {
            command: command.into(),
            execution_plan,
            results: Some(results),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether the creating session had no failures worth excluding the rule for.
    pub fn had_success(&self) -> bool {
        match &self.results {
            None => true,
            Some(results) => results.iter().any(|r| r.success),
        }
    }
}
