//! Content tools: selection, text rewriting, summarization.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use webtailor_protocols::error::ToolError;
use webtailor_protocols::tool::{parse_params, ParameterKind, Tool, ToolDefinition, ToolOutput};

use crate::prompts;
use crate::sanitize::strip_wrapping_quotes;
use crate::session::PageSession;

use super::{MODIFY_TEXT_TOOL, SELECT_ELEMENTS_TOOL, SUMMARIZE_CONTENT_TOOL};

pub use webtailor_protocols::document::{MODIFIED_ATTR, ORIGINAL_TEXT_ATTR, TRANSFORM_TYPE_ATTR};

const MIN_MODIFIABLE_CHARS: usize = 10;
const MAX_TRANSFORM_CHARS: usize = 3000;
const MIN_SUMMARY_CHARS: usize = 100;
const MAX_SUMMARY_CHARS: usize = 15000;

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

// ============================================================================
// selectElements
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SelectElementsParams {
    #[serde(default)]
    pub criteria: String,
    #[serde(default)]
    pub context: String,
}

/// Choose selectors for elements described in natural language.
pub struct SelectElementsTool {
    definition: ToolDefinition,
    session: Arc<PageSession>,
}

impl SelectElementsTool {
    pub fn new(session: Arc<PageSession>) -> Self {
        Self {
            definition: ToolDefinition::new(
                SELECT_ELEMENTS_TOOL,
                "Intelligently select DOM elements based on natural language criteria. \
                 Usually a sub-step for other tools.",
            )
            .with_parameter("criteria", ParameterKind::String, true)
            .with_parameter("context", ParameterKind::String, false)
            .generative(),
            session,
        }
    }
}

#[async_trait]
impl Tool for SelectElementsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let params: SelectElementsParams = parse_params(params)?;
        let selected = self
            .session
            .select_elements(&params.criteria, &params.context)
            .await;
        Ok(ToolOutput::new(json!({ "selected": selected })))
    }
}

// ============================================================================
// modifyText
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ModifyTextParams {
    #[serde(default)]
    pub selectors: Vec<String>,
    #[serde(rename = "transformType")]
    pub transform_type: String,
    #[serde(default)]
    pub instructions: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextModification {
    pub selector: String,
    pub original_text: String,
    pub transformed_text: String,
}

/// Rewrite the text of matched elements through the generation service.
pub struct ModifyTextTool {
    definition: ToolDefinition,
    session: Arc<PageSession>,
}

impl ModifyTextTool {
    pub fn new(session: Arc<PageSession>) -> Self {
        Self {
            definition: ToolDefinition::new(
                MODIFY_TEXT_TOOL,
                "Transform text content of specified elements using AI (e.g., summarize, de-clickbait, simplify). \
                 This is applied dynamically on each load.",
            )
            .with_parameter("selectors", ParameterKind::Array, true)
            .with_parameter("transformType", ParameterKind::String, true)
            .with_parameter("instructions", ParameterKind::String, false)
            .generative(),
            session,
        }
    }

    async fn transform_text(&self, text: &str, params: &ModifyTextParams) -> Result<String, ToolError> {
        let text = if char_len(text) > MAX_TRANSFORM_CHARS {
            format!("{}... (truncated)", truncate_chars(text, MAX_TRANSFORM_CHARS))
        } else {
            text.to_string()
        };
        let prompt = prompts::transform_text(&text, &params.transform_type, &params.instructions);
        let response = self.session.generate(&prompt).await?;
        Ok(strip_wrapping_quotes(&response))
    }

    /// Rewrite every element matching one selector. Stops at the first error.
    async fn modify_matches(
        &self,
        selector: &str,
        params: &ModifyTextParams,
        modifications: &mut Vec<TextModification>,
    ) -> Result<(), ToolError> {
        let document = self.session.document();
        let elements = document.query_selector_all(selector)?;
        if elements.is_empty() {
            warn!("No elements found for selector: {}", selector);
            return Ok(());
        }

        for element in elements {
            let original = element.text.trim();
            if char_len(original) < MIN_MODIFIABLE_CHARS {
                continue;
            }
            if element.attribute(MODIFIED_ATTR) == Some("true")
                && element.attribute(TRANSFORM_TYPE_ATTR) == Some(params.transform_type.as_str())
            {
                continue;
            }

            let transformed = self.transform_text(original, params).await?;
            if transformed.is_empty() || transformed == original {
                continue;
            }

            if element.attribute(ORIGINAL_TEXT_ATTR).is_none_or(str::is_empty) {
                document.set_attribute(element.node, ORIGINAL_TEXT_ATTR, original)?;
            }
            document.set_text(element.node, &transformed)?;
            document.set_attribute(element.node, MODIFIED_ATTR, "true")?;
            document.set_attribute(element.node, TRANSFORM_TYPE_ATTR, &params.transform_type)?;

            modifications.push(TextModification {
                selector: selector.to_string(),
                original_text: original.to_string(),
                transformed_text: transformed,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Tool for ModifyTextTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let params: ModifyTextParams = parse_params(params)?;
        if params.selectors.is_empty() {
            return Ok(ToolOutput::new(json!({
                "modifiedCount": 0,
                "message": "No selectors provided for text modification.",
            })));
        }

        let mut modifications = Vec::new();
        for selector in &params.selectors {
            if let Err(e) = self.modify_matches(selector, &params, &mut modifications).await {
                warn!("Error processing selector {} in modifyText: {}", selector, e);
            }
        }

        let count = modifications.len();
        debug!(count, "Text modification finished");
        Ok(ToolOutput::new(json!({
            "modifiedCount": count,
            "modifications": modifications,
            "message": format!("Modified {} element(s).", count),
        })))
    }
}

// ============================================================================
// summarizeContent
// ============================================================================

fn default_length() -> String {
    "medium".to_string()
}

#[derive(Debug, Deserialize)]
pub struct SummarizeContentParams {
    #[serde(default)]
    pub selectors: Vec<String>,
    #[serde(default = "default_length")]
    pub length: String,
}

/// Summarize selected elements or the main content area.
pub struct SummarizeContentTool {
    definition: ToolDefinition,
    session: Arc<PageSession>,
}

impl SummarizeContentTool {
    pub fn new(session: Arc<PageSession>) -> Self {
        Self {
            definition: ToolDefinition::new(
                SUMMARIZE_CONTENT_TOOL,
                "Summarize the main content of the page or specific elements. This is applied dynamically on each load.",
            )
            .with_parameter("selectors", ParameterKind::Array, false)
            .with_parameter("length", ParameterKind::String, false)
            .generative(),
            session,
        }
    }

    async fn collect_text(&self, selectors: &[String]) -> Result<String, ToolError> {
        let document = self.session.document();
        let mut text = String::new();

        if !selectors.is_empty() {
            for selector in selectors {
                match document.query_selector_all(selector) {
                    Ok(elements) => {
                        for element in elements {
                            text.push_str(element.text.trim());
                            text.push_str("\n\n");
                        }
                    }
                    Err(e) => warn!("Invalid selector in summarizeContent: {}: {}", selector, e),
                }
            }
            return Ok(text);
        }

        let snapshot = self.session.snapshot().await?;
        let main = document
            .query_selector_all(&snapshot.structure.main_content_selector)
            .ok()
            .and_then(|elements| elements.into_iter().next());
        match main {
            Some(element) => text = element.text.trim().to_string(),
            None => {
                for paragraph in &snapshot.paragraphs {
                    text.push_str(&paragraph.text);
                    text.push_str("\n\n");
                }
            }
        }
        Ok(text)
    }
}

#[async_trait]
impl Tool for SummarizeContentTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let params: SummarizeContentParams = parse_params(params)?;
        let text = self.collect_text(&params.selectors).await?;

        let original_length = char_len(&text);
        if original_length < MIN_SUMMARY_CHARS {
            return Ok(ToolOutput::new(json!({
                "summary": "Not enough content to summarize or content not found.",
                "originalLength": original_length,
            })));
        }

        let text = truncate_chars(&text, MAX_SUMMARY_CHARS);
        let summary = self
            .session
            .generate(&prompts::summarize(&text, &params.length))
            .await?;

        Ok(ToolOutput::new(json!({
            "summary": summary,
            "originalLength": char_len(&text),
            "summarizedLength": char_len(&summary),
        })))
    }
}
