//! Serializable element trees used to build documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use webtailor_protocols::document::AddedNode;

/// An element and its subtree, as loaded from a fixture or appended later.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageNode {
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub classes: Vec<String>,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    /// Text preceding the children.
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub children: Vec<PageNode>,
}

impl PageNode {
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

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: PageNode) -> Self {
        self.children.push(child);
        self
    }

    /// Structural summary of this subtree for mutation observers.
    pub fn to_added_node(&self) -> AddedNode {
        AddedNode {
            tag: self.tag.to_ascii_lowercase(),
            id: self.id.clone(),
            classes: self.classes.clone(),
            children: self.children.iter().map(PageNode::to_added_node).collect(),
        }
    }
}

/// A whole page: location, title and body subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFixture {
    pub url: String,

    #[serde(default)]
    pub title: String,

    /// The `<body>` element. Its tag is forced to `body`.
    #[serde(default = "default_body")]
    pub body: PageNode,
}

fn default_body() -> PageNode {
    PageNode::new("body")
}

impl PageFixture {
    pub fn new(url: impl Into<String>, title: impl Into<String>, body: PageNode) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            body,
        }
    }
}
