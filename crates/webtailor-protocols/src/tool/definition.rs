//! Tool definition types.

use serde::{Deserialize, Serialize};

/// Whether a tool's effect is deterministic or produced by generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Applies exactly what its parameters say.
    #[default]
    Static,
    /// Calls the generation service; output differs between runs.
    Generative,
}

/// Type of a named tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    String,
    Array,
}

impl ParameterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Array => "array",
        }
    }
}

/// One named, typed parameter of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParameterKind,
    #[serde(default)]
    pub required: bool,
}

/// Definition of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name plans use to address the tool.
    pub id: String,

    /// Description shown to the planner.
    pub description: String,

    /// Parameter contract, in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,

    /// Static or generative.
    #[serde(default)]
    pub kind: ToolKind,
}

impl ToolDefinition {
    /// Create a new static tool definition with no parameters.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            parameters: Vec::new(),
            kind: ToolKind::Static,
        }
    }

    /// Add a parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, kind: ParameterKind, required: bool) -> Self {
        self.parameters.push(ParameterSpec {
            name: name.into(),
            kind,
            required,
        });
        self
    }

    /// Mark the tool as generative.
    pub fn generative(mut self) -> Self {
        self.kind = ToolKind::Generative;
        self
    }

    /// Compact `{name: type}` map used in planning prompts.
    pub fn parameter_summary(&self) -> serde_json::Value {
        let map = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), serde_json::json!(p.kind.as_str())))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_defaults() {
        let def = ToolDefinition::new("applyCSS", "Apply CSS");
        assert_eq!(def.kind, ToolKind::Static);
        assert!(def.parameters.is_empty());
    }

    #[test]
    fn test_parameter_summary_keeps_declared_names() {
        let def = ToolDefinition::new("generateCSS", "Generate CSS")
            .with_parameter("description", ParameterKind::String, true)
            .with_parameter("targetElements", ParameterKind::Array, false)
            .generative();
        assert_eq!(def.kind, ToolKind::Generative);
        assert_eq!(
            def.parameter_summary(),
            serde_json::json!({"description": "string", "targetElements": "array"})
        );
    }

    #[test]
    fn test_definition_serialization() {
        let def = ToolDefinition::new("hideElements", "Hide").generative();
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["kind"], "generative");
        let back: ToolDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, "hideElements");
    }
}
