//! Shared state of one page the tools operate on.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use webtailor_core::{parse_json_response, AppliedStyleSet};
use webtailor_protocols::document::Document;
use webtailor_protocols::error::{DocumentError, GenerationError};
use webtailor_protocols::provider::GenerationClient;
use webtailor_protocols::snapshot::{PageContextSnapshot, SnapshotProvider};

use crate::prompts;
use crate::sanitize::sanitize_css;
use crate::selection::prefilter;

/// Description prefixes of blocks that may legitimately be re-applied.
const DYNAMIC_PREFIXES: &[&str] = &["Generated CSS:", "Layout:", "Hide:"];

/// Result of appending a block to the customization stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedCss {
    pub applied_in_this_call: bool,
    pub already_applied_session: bool,
    pub description: String,
    #[serde(rename = "finalCSS", default, skip_serializing_if = "Option::is_none")]
    pub final_css: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SelectionResponse {
    #[serde(default)]
    selected: Vec<String>,
}

/// The document, its snapshot source, the generation client and the
/// session's applied-style record, shared by every page tool.
pub struct PageSession {
    document: Arc<dyn Document>,
    snapshots: Arc<dyn SnapshotProvider>,
    generation: Arc<dyn GenerationClient>,
    styles: Arc<AppliedStyleSet>,
}

impl PageSession {
    pub fn new(
        document: Arc<dyn Document>,
        snapshots: Arc<dyn SnapshotProvider>,
        generation: Arc<dyn GenerationClient>,
        styles: Arc<AppliedStyleSet>,
    ) -> Self {
        Self {
            document,
            snapshots,
            generation,
            styles,
        }
    }

    pub fn document(&self) -> &Arc<dyn Document> {
        &self.document
    }

    pub fn styles(&self) -> &Arc<AppliedStyleSet> {
        &self.styles
    }

    pub async fn snapshot(&self) -> Result<PageContextSnapshot, DocumentError> {
        self.snapshots.snapshot().await
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.generation.generate(prompt).await
    }

    /// Sanitize `css` and append it under a comment naming `description`.
    ///
    /// A block whose key was already applied this session is skipped unless
    /// its description marks generated, layout or hiding output.
    pub fn apply_css(&self, css: &str, description: &str) -> AppliedCss {
        let clean = sanitize_css(css);
        if clean.is_empty() {
            return AppliedCss {
                applied_in_this_call: false,
                already_applied_session: false,
                description: description.to_string(),
                final_css: None,
                message: Some("No CSS to apply (empty or sanitized).".to_string()),
            };
        }

        let key = if description.is_empty() {
            AppliedStyleSet::fingerprint(&clean)
        } else {
            description.to_string()
        };
        let dynamic = DYNAMIC_PREFIXES.iter().any(|p| description.starts_with(p));
        if self.styles.contains(&key) && !dynamic {
            debug!(key = %key, "Stylesheet block already applied");
            return AppliedCss {
                applied_in_this_call: false,
                already_applied_session: true,
                description: description.to_string(),
                final_css: None,
                message: Some("CSS with this description was already applied in this session.".to_string()),
            };
        }

        self.document
            .append_style(&format!("\n/* AI Customization: {} */\n{}\n", description, clean));
        self.styles.insert(key);
        debug!(description = %description, bytes = clean.len(), "Applied stylesheet block");

        AppliedCss {
            applied_in_this_call: true,
            already_applied_session: false,
            description: description.to_string(),
            final_css: Some(clean),
            message: None,
        }
    }

    /// Ask the generation service for selectors matching `criteria`.
    ///
    /// Every failure yields an empty selection.
    pub async fn select_elements(&self, criteria: &str, context: &str) -> Vec<String> {
        let snapshot = match self.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Element selection without page context: {}", e);
                return Vec::new();
            }
        };

        let candidates = prefilter(&snapshot.elements, criteria);
        let prompt = prompts::selection(criteria, context, &snapshot, &candidates);

        let response = match self.generate(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Element selection failed: {}", e);
                return Vec::new();
            }
        };

        match parse_json_response::<SelectionResponse>(&response) {
            Ok(parsed) => parsed.selected,
            Err(e) => {
                warn!("Element selection returned an unusable response: {}", e);
                Vec::new()
            }
        }
    }
}
