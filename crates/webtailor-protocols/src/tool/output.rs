//! Tool output type.

use serde::{Deserialize, Serialize};

/// Key under which a tool reports the concrete stylesheet it produced.
pub const CSS_KEY: &str = "css";

/// Key under which a tool reports a human-readable description.
pub const DESCRIPTION_KEY: &str = "description";

/// Output of a tool execution.
///
/// The shape depends on the tool. Caching only inspects two fields: a
/// string `css` (the action resolved to a static stylesheet) and an
/// optional `description`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolOutput(serde_json::Value);

impl ToolOutput {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// The resolved stylesheet, if the output carries one as a string.
    pub fn css_text(&self) -> Option<&str> {
        self.0.get(CSS_KEY).and_then(serde_json::Value::as_str)
    }

    /// The output's own description, if non-empty.
    pub fn description(&self) -> Option<&str> {
        self.0
            .get(DESCRIPTION_KEY)
            .and_then(serde_json::Value::as_str)
            .filter(|d| !d.is_empty())
    }

    /// Look up an arbitrary field.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for ToolOutput {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
