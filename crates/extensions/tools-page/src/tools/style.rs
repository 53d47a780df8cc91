//! Stylesheet tools: apply, generate, hide, layout.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use webtailor_protocols::error::ToolError;
use webtailor_protocols::plan::APPLY_CSS_TOOL;
use webtailor_protocols::tool::{parse_params, ParameterKind, Tool, ToolDefinition, ToolOutput};

use crate::prompts;
use crate::sanitize::strip_code_fences;
use crate::session::PageSession;

use super::{GENERATE_CSS_TOOL, HIDE_ELEMENTS_TOOL, TRANSFORM_LAYOUT_TOOL};

const TARGET_CONTEXT_LIMIT: usize = 5;

fn to_output<T: serde::Serialize>(value: &T) -> Result<ToolOutput, ToolError> {
    serde_json::to_value(value)
        .map(ToolOutput::new)
        .map_err(|e| ToolError::ExecutionFailed(e.to_string()))
}

// ============================================================================
// applyCSS
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApplyCssParams {
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub description: String,
}

/// Append a stylesheet block as given.
pub struct ApplyCssTool {
    definition: ToolDefinition,
    session: Arc<PageSession>,
}

impl ApplyCssTool {
    pub fn new(session: Arc<PageSession>) -> Self {
        Self {
            definition: ToolDefinition::new(
                APPLY_CSS_TOOL,
                "Apply custom CSS rules to modify page styling. Use for direct styling changes.",
            )
            .with_parameter("css", ParameterKind::String, true)
            .with_parameter("description", ParameterKind::String, false),
            session,
        }
    }
}

#[async_trait]
impl Tool for ApplyCssTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let params: ApplyCssParams = parse_params(params)?;
        let applied = self.session.apply_css(&params.css, &params.description);
        to_output(&applied)
    }
}

// ============================================================================
// generateCSS
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateCssParams {
    pub description: String,
    #[serde(default, rename = "targetElements")]
    pub target_elements: Vec<String>,
}

/// Generate a stylesheet from a description and apply it.
pub struct GenerateCssTool {
    definition: ToolDefinition,
    session: Arc<PageSession>,
}

impl GenerateCssTool {
    pub fn new(session: Arc<PageSession>) -> Self {
        Self {
            definition: ToolDefinition::new(
                GENERATE_CSS_TOOL,
                "Generate CSS based on a natural language description of desired style changes. \
                 Output will be cached for future applications.",
            )
            .with_parameter("description", ParameterKind::String, true)
            .with_parameter("targetElements", ParameterKind::Array, false)
            .generative(),
            session,
        }
    }

    fn describe_targets(&self, targets: &[String]) -> Vec<(String, Option<String>)> {
        targets
            .iter()
            .take(TARGET_CONTEXT_LIMIT)
            .map(|selector| {
                let found = self
                    .session
                    .document()
                    .query_selector_all(selector)
                    .ok()
                    .and_then(|matches| matches.into_iter().next())
                    .map(|el| {
                        let text: String = el.text.chars().take(100).collect();
                        format!("tag {}, classes \"{}\", text \"{}\"", el.tag, el.classes.join(" "), text)
                    });
                (selector.clone(), found)
            })
            .collect()
    }
}

#[async_trait]
impl Tool for GenerateCssTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let params: GenerateCssParams = parse_params(params)?;
        let snapshot = self.session.snapshot().await?;

        let targets = self.describe_targets(&params.target_elements);
        let context = prompts::style_context(&snapshot.structure, &targets);
        let prompt = prompts::generate_css(&params.description, &context, snapshot.theme);

        let css = strip_code_fences(&self.session.generate(&prompt).await?);
        if css.is_empty() {
            debug!(description = %params.description, "No CSS generated");
            return Ok(ToolOutput::new(json!({
                "css": null,
                "description": "No CSS generated or applied.",
                "appliedNow": false,
            })));
        }

        let description = format!("Generated CSS: {}", params.description);
        self.session.apply_css(&css, &description);
        Ok(ToolOutput::new(json!({
            "css": css,
            "description": description,
            "appliedNow": true,
        })))
    }
}

// ============================================================================
// hideElements
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HideElementsParams {
    #[serde(default)]
    pub criteria: Option<String>,
    #[serde(default)]
    pub selectors: Option<Vec<String>>,
}

/// Hide elements given directly or chosen by criteria.
pub struct HideElementsTool {
    definition: ToolDefinition,
    session: Arc<PageSession>,
}

impl HideElementsTool {
    pub fn new(session: Arc<PageSession>) -> Self {
        Self {
            definition: ToolDefinition::new(
                HIDE_ELEMENTS_TOOL,
                "Hide elements matching AI-determined criteria or specific selectors. \
                 Generated hiding CSS will be cached.",
            )
            .with_parameter("criteria", ParameterKind::String, false)
            .with_parameter("selectors", ParameterKind::Array, false)
            .generative(),
            session,
        }
    }
}

#[async_trait]
impl Tool for HideElementsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let params: HideElementsParams = parse_params(params)?;
        let criteria = params.criteria.filter(|c| !c.trim().is_empty());

        let base = match (&criteria, &params.selectors) {
            (Some(criteria), _) => criteria.clone(),
            (None, Some(_)) => "selected elements".to_string(),
            (None, None) => "unspecified elements".to_string(),
        };
        let description = format!("Hide: {}", base);

        let selectors = match (params.selectors, &criteria) {
            (Some(selectors), _) => selectors,
            (None, Some(criteria)) => self.session.select_elements(criteria, "hiding elements").await,
            (None, None) => {
                return Err(ToolError::InvalidParameters(
                    "Either 'criteria' or 'selectors' must be provided for hideElements".to_string(),
                ));
            }
        };

        if selectors.is_empty() {
            return Ok(ToolOutput::new(json!({
                "hiddenSelectors": [],
                "css": null,
                "description": description,
                "message": "No elements selected for hiding.",
            })));
        }

        let css = selectors
            .iter()
            .map(|selector| format!("{} {{ display: none !important; }}", selector))
            .collect::<Vec<_>>()
            .join("\n");
        self.session.apply_css(&css, &description);

        Ok(ToolOutput::new(json!({
            "hiddenSelectors": selectors,
            "css": css,
            "description": description,
        })))
    }
}

// ============================================================================
// transformLayout
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TransformLayoutParams {
    pub transformation: String,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Generate and apply layout CSS informed by the page structure.
pub struct TransformLayoutTool {
    definition: ToolDefinition,
    session: Arc<PageSession>,
}

impl TransformLayoutTool {
    pub fn new(session: Arc<PageSession>) -> Self {
        Self {
            definition: ToolDefinition::new(
                TRANSFORM_LAYOUT_TOOL,
                "Modify page layout structure using generated CSS. Output will be cached for future applications.",
            )
            .with_parameter("transformation", ParameterKind::String, true)
            .with_parameter("scope", ParameterKind::String, false)
            .generative(),
            session,
        }
    }

    fn scope_matches(&self, scope: &str) -> bool {
        let looks_like_selector = scope
            .chars()
            .next()
            .is_some_and(|c| matches!(c, '#' | '.' | '[') || c.is_alphanumeric() || c == '_');
        looks_like_selector
            && self
                .session
                .document()
                .query_selector_all(scope)
                .is_ok_and(|matches| !matches.is_empty())
    }
}

#[async_trait]
impl Tool for TransformLayoutTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let params: TransformLayoutParams = parse_params(params)?;
        let snapshot = self.session.snapshot().await?;
        let structure = &snapshot.structure;

        let mut target = structure.main_content_selector.clone();
        let mut goal = params.transformation.clone();
        if let Some(scope) = params.scope.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if self.scope_matches(scope) {
                target = scope.to_string();
            } else {
                goal = format!("{} (focus on scope: {})", goal, scope);
            }
        }

        let prompt = prompts::transform_layout(&goal, &target, structure);
        let css = strip_code_fences(&self.session.generate(&prompt).await?);
        let description = format!("Layout: {}", params.transformation);

        if css.is_empty() {
            return Ok(ToolOutput::new(json!({
                "css": null,
                "applied": false,
                "description": description,
            })));
        }

        self.session.apply_css(&css, &description);
        Ok(ToolOutput::new(json!({
            "css": css,
            "applied": true,
            "description": description,
        })))
    }
}
