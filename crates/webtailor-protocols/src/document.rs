//! Live document abstraction.
//!
//! Tools mutate the page through this trait. Implementations are expected
//! to be driven from a single logical task sequence; concurrent writers are
//! not serialized.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Attribute holding an element's text from before its first rewrite.
pub const ORIGINAL_TEXT_ATTR: &str = "data-original-text";

/// Marks an element whose text was rewritten.
pub const MODIFIED_ATTR: &str = "data-ai-modified";

pub const TRANSFORM_TYPE_ATTR: &str = "data-ai-transform-type";

/// Opaque handle of an element within one document.
pub type NodeId = usize;

/// Where the document was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLocation {
    pub url: String,
    pub hostname: String,
}

/// A matched element, as seen at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRef {
    pub node: NodeId,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Trimmed text content.
    pub text: String,
}

impl ElementRef {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// An element inserted into the document, with its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddedNode {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub children: Vec<AddedNode>,
}

impl AddedNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_child(mut self, child: AddedNode) -> Self {
        self.children.push(child);
        self
    }

    /// This node followed by all of its descendants, depth first.
    pub fn descendants(&self) -> Vec<&AddedNode> {
        let mut out = vec![self];
        let mut i = 0;
        while i < out.len() {
            let node = out[i];
            out.extend(node.children.iter());
            i += 1;
        }
        out
    }
}

/// A batch of structural changes observed on the document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MutationRecord {
    #[serde(default)]
    pub added_nodes: Vec<AddedNode>,
}

impl MutationRecord {
    pub fn added(nodes: Vec<AddedNode>) -> Self {
        Self { added_nodes: nodes }
    }
}

/// The live document.
pub trait Document: Send + Sync {
    fn location(&self) -> PageLocation;

    fn title(&self) -> String;

    /// Append a block to the customization stylesheet.
    fn append_style(&self, css: &str);

    /// Current text of the customization stylesheet.
    fn stylesheet(&self) -> String;

    /// Empty the customization stylesheet.
    fn clear_styles(&self);

    /// All elements matching `selector`, in document order.
    fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementRef>, DocumentError>;

    fn set_text(&self, node: NodeId, text: &str) -> Result<(), DocumentError>;

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<(), DocumentError>;

    fn remove_attribute(&self, node: NodeId, name: &str) -> Result<(), DocumentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_node_descendants() {
        let node = AddedNode::new("DIV")
            .with_child(AddedNode::new("p"))
            .with_child(AddedNode::new("div").with_child(AddedNode::new("section").with_id("comments")));
        let tags: Vec<_> = node.descendants().iter().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, vec!["div", "p", "div", "section"]);
    }

    #[test]
    fn test_element_ref_attribute() {
        let mut element = ElementRef {
            node: 3,
            tag: "p".to_string(),
            id: None,
            classes: vec![],
            attributes: BTreeMap::new(),
            text: "hello".to_string(),
        };
        assert!(element.attribute("data-ai-modified").is_none());
        element
            .attributes
            .insert("data-ai-modified".to_string(), "true".to_string());
        assert_eq!(element.attribute("data-ai-modified"), Some("true"));
    }
}
