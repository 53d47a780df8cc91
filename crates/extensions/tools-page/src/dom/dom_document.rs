//! Arena-backed in-memory implementation of [`Document`].

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use webtailor_protocols::document::{Document, ElementRef, MutationRecord, NodeId, PageLocation};
use webtailor_protocols::error::DocumentError;

use super::dom_node::{PageFixture, PageNode};
use super::selector::SelectorList;

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Includes `id` and `class` mirrors so attribute selectors see them.
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl NodeData {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Element arena. Node 0 is `<body>`; detached nodes stay allocated.
#[derive(Debug, Default)]
pub(crate) struct Tree {
    nodes: Vec<NodeData>,
}

pub(crate) const BODY: NodeId = 0;

impl Tree {
    fn from_body(body: &PageNode) -> Self {
        let mut tree = Self::default();
        let mut body = body.clone();
        body.tag = "body".to_string();
        tree.insert(None, &body);
        tree
    }

    fn insert(&mut self, parent: Option<NodeId>, node: &PageNode) -> NodeId {
        let mut attributes = node.attributes.clone();
        let id = node
            .id
            .clone()
            .or_else(|| attributes.get("id").cloned())
            .filter(|id| !id.is_empty());
        let mut classes: Vec<String> = node.classes.clone();
        if let Some(class_attr) = attributes.get("class") {
            for class in class_attr.split_whitespace() {
                if !classes.iter().any(|c| c == class) {
                    classes.push(class.to_string());
                }
            }
        }
        if let Some(id) = &id {
            attributes.insert("id".to_string(), id.clone());
        }
        if !classes.is_empty() {
            attributes.insert("class".to_string(), classes.join(" "));
        }

        let index = self.nodes.len();
        self.nodes.push(NodeData {
            tag: node.tag.to_ascii_lowercase(),
            id,
            classes,
            attributes,
            text: node.text.clone(),
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        for child in &node.children {
            self.insert(Some(index), child);
        }
        index
    }

    pub fn get(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node)
    }

    fn get_mut(&mut self, node: NodeId) -> Result<&mut NodeData, DocumentError> {
        self.nodes.get_mut(node).ok_or(DocumentError::NodeNotFound(node))
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// 1-based position among siblings with the same tag.
    pub fn index_of_type(&self, node: NodeId) -> Option<usize> {
        let tag = &self.get(node)?.tag;
        let Some(parent) = self.parent(node) else {
            return Some(1);
        };
        self.children(parent)
            .iter()
            .filter(|&&sibling| self.nodes[sibling].tag == *tag)
            .position(|&sibling| sibling == node)
            .map(|p| p + 1)
    }

    /// Attached nodes in document order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![BODY];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        out
    }

    pub fn select(&self, selectors: &SelectorList) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&node| selectors.matches(self, node))
            .collect()
    }

    /// Whitespace-joined text of a node and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut parts = Vec::new();
        self.collect_text(node, &mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, node: NodeId, parts: &mut Vec<&'a str>) {
        let Some(data) = self.get(node) else {
            return;
        };
        let own = data.text.trim();
        if !own.is_empty() {
            parts.push(own);
        }
        for &child in &data.children {
            self.collect_text(child, parts);
        }
    }

    pub fn element_ref(&self, node: NodeId) -> Option<ElementRef> {
        let data = self.get(node)?;
        Some(ElementRef {
            node,
            tag: data.tag.clone(),
            id: data.id.clone(),
            classes: data.classes.clone(),
            attributes: data.attributes.clone(),
            text: self.text_content(node),
        })
    }
}

/// A [`Document`] held entirely in memory.
///
/// Backs the command line and tests. The injected stylesheet is plain text.
pub struct InMemoryDocument {
    location: PageLocation,
    title: String,
    pub(crate) tree: RwLock<Tree>,
    stylesheet: RwLock<String>,
}

impl InMemoryDocument {
    /// An empty page at `url`.
    pub fn new(url: &str, title: impl Into<String>) -> Result<Self, DocumentError> {
        Self::from_fixture(PageFixture::new(url, title, PageNode::new("body")))
    }

    pub fn from_fixture(fixture: PageFixture) -> Result<Self, DocumentError> {
        let parsed = url::Url::parse(&fixture.url)
            .map_err(|e| DocumentError::Unavailable(format!("invalid URL {}: {}", fixture.url, e)))?;
        let hostname = parsed.host_str().unwrap_or_default().to_string();

        Ok(Self {
            location: PageLocation {
                url: fixture.url,
                hostname,
            },
            title: fixture.title,
            tree: RwLock::new(Tree::from_body(&fixture.body)),
            stylesheet: RwLock::new(String::new()),
        })
    }

    /// Parse a JSON page fixture.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let fixture: PageFixture = serde_json::from_str(json)
            .map_err(|e| DocumentError::Unavailable(format!("invalid page fixture: {}", e)))?;
        Self::from_fixture(fixture)
    }

    pub fn body(&self) -> NodeId {
        BODY
    }

    /// Insert `node` as the last child of `parent`, reporting the insertion.
    pub fn append_child(&self, parent: NodeId, node: &PageNode) -> Result<MutationRecord, DocumentError> {
        let mut tree = self.tree.write();
        tree.get_mut(parent)?;
        let inserted = tree.insert(Some(parent), node);
        debug!(parent, inserted, tag = %node.tag, "Appended element");
        Ok(MutationRecord::added(vec![node.to_added_node()]))
    }

    /// Snapshot of one element, if attached or detached but allocated.
    pub fn element(&self, node: NodeId) -> Option<ElementRef> {
        self.tree.read().element_ref(node)
    }
}

impl Document for InMemoryDocument {
    fn location(&self) -> PageLocation {
        self.location.clone()
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn append_style(&self, css: &str) {
        self.stylesheet.write().push_str(css);
    }

    fn stylesheet(&self) -> String {
        self.stylesheet.read().clone()
    }

    fn clear_styles(&self) {
        self.stylesheet.write().clear();
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementRef>, DocumentError> {
        let selectors = SelectorList::parse(selector)?;
        let tree = self.tree.read();
        Ok(tree
            .select(&selectors)
            .into_iter()
            .filter_map(|node| tree.element_ref(node))
            .collect())
    }

    fn set_text(&self, node: NodeId, text: &str) -> Result<(), DocumentError> {
        let mut tree = self.tree.write();
        let data = tree.get_mut(node)?;
        data.text = text.to_string();
        // Like `textContent`, replacing the text drops the element's children.
        data.children.clear();
        Ok(())
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<(), DocumentError> {
        let mut tree = self.tree.write();
        let data = tree.get_mut(node)?;
        match name {
            "id" => data.id = Some(value.to_string()).filter(|v| !v.is_empty()),
            "class" => {
                data.classes = value.split_whitespace().map(String::from).collect();
            }
            _ => {}
        }
        data.attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_attribute(&self, node: NodeId, name: &str) -> Result<(), DocumentError> {
        let mut tree = self.tree.write();
        let data = tree.get_mut(node)?;
        match name {
            "id" => data.id = None,
            "class" => data.classes.clear(),
            _ => {}
        }
        data.attributes.remove(name);
        Ok(())
    }
}
