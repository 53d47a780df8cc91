//! Page description snapshots handed to generation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Detected color scheme of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

/// A short text sample with the selector it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSample {
    pub text: String,
    pub selector: String,
    pub tag: String,
}

/// Descriptor of an element the planner may want to target.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementSample {
    pub selector: String,
    pub tag: String,
    #[serde(default)]
    pub id: String,
    /// Space-separated class list.
    #[serde(default)]
    pub classes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub text: String,
}

/// Coarse layout description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStructure {
    pub main_content_selector: String,
    pub has_navigation: bool,
    pub has_sidebar: bool,
    pub has_footer: bool,
    /// `contained` or `full-width`.
    pub container_type: String,
}

impl Default for PageStructure {
    fn default() -> Self {
        Self {
            main_content_selector: "body".to_string(),
            has_navigation: false,
            has_sidebar: false,
            has_footer: false,
            container_type: "full-width".to_string(),
        }
    }
}

/// Descriptive snapshot of the page at one point in time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContextSnapshot {
    pub url: String,
    pub domain: String,
    pub title: String,
    #[serde(default)]
    pub headlines: Vec<TextSample>,
    #[serde(default)]
    pub paragraphs: Vec<TextSample>,
    #[serde(default)]
    pub elements: Vec<ElementSample>,
    #[serde(default)]
    pub structure: PageStructure,
    #[serde(default)]
    pub theme: Theme,
    /// Most recent customization descriptions applied in this session.
    #[serde(default)]
    pub existing_customizations: Vec<String>,
}

/// Builds page snapshots on demand. The core treats the result as opaque
/// input to planning and generative tools.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn snapshot(&self) -> Result<PageContextSnapshot, DocumentError>;
}
