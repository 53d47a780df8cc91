//! Page description for generation, built from the in-memory tree.

use std::collections::HashSet;

use async_trait::async_trait;

use webtailor_core::origin_key;
use webtailor_protocols::document::{Document, NodeId};
use webtailor_protocols::error::DocumentError;
use webtailor_protocols::snapshot::{
    ElementSample, PageContextSnapshot, PageStructure, SnapshotProvider, TextSample, Theme,
};

use super::dom_document::{InMemoryDocument, Tree, BODY};
use super::selector::SelectorList;

const MAX_HEADLINES: usize = 5;
const MAX_PARAGRAPHS: usize = 3;
const MAX_ELEMENTS: usize = 150;
const MAX_SELECTOR_DEPTH: usize = 4;
const ELEMENT_TEXT_LIMIT: usize = 80;

const ELEMENT_SELECTORS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "div[class]", "section[class]", "article[class]",
    "aside[class]", "nav[class]", "li", "a[href]", "button",
];

/// Tags listed even when they carry almost no text.
const STRUCTURAL_TAGS: &[&str] = &["nav", "aside", "section", "article", "button", "a"];

const NAVIGATION: &str = r#"nav, [role="navigation"], .navigation, #nav, #menu, .menu"#;
const SIDEBAR: &str = ".sidebar, aside, .side-bar, #sidebar";
const FOOTER: &str = "footer, .footer, #footer";

const MAIN_CONTENT_CANDIDATES: &[&str] = &[
    "main",
    r#"[role="main"]"#,
    "article.post",
    "div.post",
    "div.entry",
    ".main-content",
    ".main_content",
    "#main-content",
    "#main_content",
    "#content",
    ".content",
    "#page-content",
];

const CONTAINER_WRAPPERS: &[&str] = &[
    ".container",
    ".wrapper",
    ".page-wrapper",
    "#container",
    "#wrapper",
    "#page",
    ".main-container",
];

fn select(tree: &Tree, selector: &str) -> Vec<NodeId> {
    match SelectorList::parse(selector) {
        Ok(list) => tree.select(&list),
        Err(_) => Vec::new(),
    }
}

fn exists(tree: &Tree, selector: &str) -> bool {
    !select(tree, selector).is_empty()
}

fn is_unique(tree: &Tree, selector: &str) -> bool {
    select(tree, selector).len() == 1
}

fn is_plain_ident(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with(|c: char| c.is_ascii_digit())
        && value.len() < 50
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// A selector addressing `node`, preferring a unique one.
///
/// Uses `#id` when the id is unique, otherwise a child-combinator path of
/// at most four segments below `<body>`.
pub(crate) fn generate_selector(tree: &Tree, node: NodeId) -> String {
    let Some(data) = tree.get(node) else {
        return "unknown_element".to_string();
    };

    if let Some(id) = data.id.as_deref().filter(|id| is_plain_ident(id)) {
        let selector = format!("#{}", id);
        if is_unique(tree, &selector) {
            return selector;
        }
    }

    let mut path = String::new();
    let mut current = node;
    let mut depth = 0;
    while current != BODY && depth < MAX_SELECTOR_DEPTH {
        let Some(element) = tree.get(current) else {
            break;
        };
        let mut segment = element.tag.clone();
        let classes: Vec<&str> = element
            .classes
            .iter()
            .map(String::as_str)
            .filter(|c| is_plain_ident(c))
            .take(2)
            .collect();

        if !classes.is_empty() {
            segment.push('.');
            segment.push_str(&classes.join("."));
        } else if let Some(parent) = tree.parent(current) {
            let same_tag = tree
                .children(parent)
                .iter()
                .filter(|&&s| tree.get(s).is_some_and(|d| d.tag == element.tag))
                .count();
            if same_tag > 1 {
                if let Some(index) = tree.index_of_type(current) {
                    segment.push_str(&format!(":nth-of-type({})", index));
                }
            }
        }

        path = if path.is_empty() {
            segment
        } else {
            format!("{} > {}", segment, path)
        };

        if path.len() > 5 && is_unique(tree, &path) {
            return path;
        }

        let Some(parent) = tree.parent(current) else {
            break;
        };
        current = parent;
        depth += 1;
    }

    if path.is_empty() { data.tag.clone() } else { path }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn headlines(tree: &Tree) -> Vec<TextSample> {
    select(tree, "h1, h2, h3, h4, h5, h6")
        .into_iter()
        .filter_map(|node| {
            let text = tree.text_content(node);
            let len = text.chars().count();
            (len > 3 && len < 200).then(|| TextSample {
                selector: generate_selector(tree, node),
                tag: tree.get(node).map(|d| d.tag.clone()).unwrap_or_default(),
                text,
            })
        })
        .take(MAX_HEADLINES)
        .collect()
}

fn paragraphs(tree: &Tree) -> Vec<TextSample> {
    select(tree, "p")
        .into_iter()
        .filter(|&node| tree.children(node).is_empty())
        .filter_map(|node| {
            let text = tree.text_content(node);
            let len = text.chars().count();
            (len > 20 && len < 500).then(|| TextSample {
                selector: generate_selector(tree, node),
                tag: "p".to_string(),
                text,
            })
        })
        .take(MAX_PARAGRAPHS)
        .collect()
}

fn elements(tree: &Tree) -> Vec<ElementSample> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for selector in ELEMENT_SELECTORS {
        for node in select(tree, selector) {
            let Some(data) = tree.get(node) else {
                continue;
            };
            let generated = generate_selector(tree, node);
            if !seen.insert(generated.clone()) {
                continue;
            }
            let text = tree.text_content(node);
            if text.chars().count() <= 2 && !STRUCTURAL_TAGS.contains(&data.tag.as_str()) {
                continue;
            }
            let truncated: String = text.chars().take(ELEMENT_TEXT_LIMIT).collect();
            out.push(ElementSample {
                selector: generated,
                tag: data.tag.clone(),
                id: data.id.clone().unwrap_or_default(),
                classes: data.classes.join(" "),
                role: data.attribute("role").map(String::from),
                text: normalize_whitespace(&truncated),
            });
        }
    }

    out.truncate(MAX_ELEMENTS);
    out
}

fn structure(tree: &Tree) -> PageStructure {
    let main_content_selector = MAIN_CONTENT_CANDIDATES
        .iter()
        .find(|candidate| exists(tree, candidate))
        .map(|s| s.to_string())
        .unwrap_or_else(|| "body".to_string());

    let contained = CONTAINER_WRAPPERS.iter().any(|w| exists(tree, w));

    PageStructure {
        main_content_selector,
        has_navigation: exists(tree, NAVIGATION),
        has_sidebar: exists(tree, SIDEBAR),
        has_footer: exists(tree, FOOTER),
        container_type: if contained { "contained" } else { "full-width" }.to_string(),
    }
}

fn theme(tree: &Tree) -> Theme {
    let Some(body) = tree.get(BODY) else {
        return Theme::Light;
    };
    let dark_class = body.classes.iter().any(|c| c == "dark" || c == "dark-mode");
    if dark_class || body.attribute("data-theme") == Some("dark") {
        Theme::Dark
    } else {
        Theme::Light
    }
}

#[async_trait]
impl SnapshotProvider for InMemoryDocument {
    async fn snapshot(&self) -> Result<PageContextSnapshot, DocumentError> {
        let location = self.location();
        let tree = self.tree.read();

        Ok(PageContextSnapshot {
            domain: origin_key(&location.hostname),
            url: location.url,
            title: self.title(),
            headlines: headlines(&tree),
            paragraphs: paragraphs(&tree),
            elements: elements(&tree),
            structure: structure(&tree),
            theme: theme(&tree),
            existing_customizations: Vec::new(),
        })
    }
}
