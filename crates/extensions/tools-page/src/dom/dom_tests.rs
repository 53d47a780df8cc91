use super::*;
use webtailor_protocols::document::Document;
use webtailor_protocols::error::DocumentError;
use webtailor_protocols::snapshot::{SnapshotProvider, Theme};

fn news_page() -> InMemoryDocument {
    let body = PageNode::new("body")
        .with_child(
            PageNode::new("nav")
                .with_class("menu")
                .with_child(PageNode::new("a").with_attr("href", "/").with_text("Home"))
                .with_child(PageNode::new("a").with_attr("href", "/world").with_text("World")),
        )
        .with_child(
            PageNode::new("main")
                .with_child(PageNode::new("h1").with_text("Markets rally on rate news"))
                .with_child(
                    PageNode::new("p").with_text("Stocks climbed sharply after the announcement on Tuesday."),
                )
                .with_child(PageNode::new("p").with_text("Short."))
                .with_child(
                    PageNode::new("div")
                        .with_id("ad-top")
                        .with_class("ad-banner")
                        .with_text("Buy now"),
                ),
        )
        .with_child(PageNode::new("aside").with_class("sidebar").with_text("Related"))
        .with_child(PageNode::new("footer").with_text("(c) News Corp"));

    InMemoryDocument::from_fixture(PageFixture::new(
        "https://www.news.example.co.uk/world/article",
        "Markets",
        body,
    ))
    .unwrap()
}

#[test]
fn test_location_from_url() {
    let doc = news_page();
    assert_eq!(doc.location().hostname, "www.news.example.co.uk");
    assert_eq!(doc.title(), "Markets");
}

#[test]
fn test_invalid_url_is_rejected() {
    let result = InMemoryDocument::new("not a url", "x");
    assert!(matches!(result, Err(DocumentError::Unavailable(_))));
}

#[test]
fn test_query_by_tag_class_and_id() {
    let doc = news_page();
    assert_eq!(doc.query_selector_all("p").unwrap().len(), 2);
    assert_eq!(doc.query_selector_all(".ad-banner").unwrap().len(), 1);
    let ad = doc.query_selector_all("#ad-top").unwrap();
    assert_eq!(ad[0].text, "Buy now");
    assert_eq!(ad[0].attribute("class"), Some("ad-banner"));
}

#[test]
fn test_query_attribute_and_combinators() {
    let doc = news_page();
    assert_eq!(doc.query_selector_all(r#"[class*="ad"]"#).unwrap().len(), 1);
    assert_eq!(doc.query_selector_all("nav > a").unwrap().len(), 2);
    assert_eq!(doc.query_selector_all("body a[href^=\"/w\"]").unwrap().len(), 1);
    assert_eq!(doc.query_selector_all("main > p:nth-of-type(2)").unwrap()[0].text, "Short.");
    assert!(doc.query_selector_all("nav > p").unwrap().is_empty());
}

#[test]
fn test_query_results_are_in_document_order() {
    let doc = news_page();
    let tags: Vec<_> = doc
        .query_selector_all("footer, h1, nav")
        .unwrap()
        .into_iter()
        .map(|e| e.tag)
        .collect();
    assert_eq!(tags, vec!["nav", "h1", "footer"]);
}

#[test]
fn test_invalid_selector() {
    let doc = news_page();
    assert!(matches!(
        doc.query_selector_all("div:hover"),
        Err(DocumentError::InvalidSelector(_))
    ));
}

#[test]
fn test_text_content_joins_descendants() {
    let doc = news_page();
    let nav = doc.query_selector_all("nav").unwrap();
    assert_eq!(nav[0].text, "Home World");
}

#[test]
fn test_set_text_replaces_children() {
    let doc = news_page();
    let nav = doc.query_selector_all("nav").unwrap()[0].node;
    doc.set_text(nav, "Menu").unwrap();
    assert!(doc.query_selector_all("nav a").unwrap().is_empty());
    assert_eq!(doc.element(nav).unwrap().text, "Menu");
}

#[test]
fn test_attributes_round_trip() {
    let doc = news_page();
    let h1 = doc.query_selector_all("h1").unwrap()[0].node;
    doc.set_attribute(h1, "data-ai-modified", "true").unwrap();
    assert_eq!(doc.query_selector_all(r#"[data-ai-modified="true"]"#).unwrap().len(), 1);
    doc.remove_attribute(h1, "data-ai-modified").unwrap();
    assert!(doc.query_selector_all("[data-ai-modified]").unwrap().is_empty());
    assert!(matches!(
        doc.set_attribute(999, "x", "y"),
        Err(DocumentError::NodeNotFound(999))
    ));
}

#[test]
fn test_stylesheet_append_and_clear() {
    let doc = news_page();
    doc.append_style("a { color: red; }\n");
    doc.append_style("p { margin: 0; }\n");
    assert_eq!(doc.stylesheet(), "a { color: red; }\np { margin: 0; }\n");
    doc.clear_styles();
    assert!(doc.stylesheet().is_empty());
}

#[test]
fn test_append_child_reports_subtree() {
    let doc = news_page();
    let record = doc
        .append_child(
            doc.body(),
            &PageNode::new("div").with_child(PageNode::new("section").with_id("comments")),
        )
        .unwrap();
    let ids: Vec<_> = record.added_nodes[0]
        .descendants()
        .into_iter()
        .filter_map(|n| n.id.clone())
        .collect();
    assert_eq!(ids, vec!["comments"]);
    assert_eq!(doc.query_selector_all("#comments").unwrap().len(), 1);
}

#[test]
fn test_fixture_from_json() {
    let doc = InMemoryDocument::from_json(
        r#"{"url":"http://localhost:8080/","title":"Dev","body":{"tag":"body","children":[{"tag":"h2","text":"Hello there"}]}}"#,
    )
    .unwrap();
    assert_eq!(doc.location().hostname, "localhost");
    assert_eq!(doc.query_selector_all("h2").unwrap()[0].text, "Hello there");
}

#[tokio::test]
async fn test_snapshot_samples() {
    let doc = news_page();
    let snapshot = doc.snapshot().await.unwrap();

    assert_eq!(snapshot.domain, "example.co.uk");
    assert_eq!(snapshot.headlines.len(), 1);
    assert_eq!(snapshot.headlines[0].tag, "h1");
    // "Short." is below the paragraph length floor.
    assert_eq!(snapshot.paragraphs.len(), 1);
    assert!(snapshot.existing_customizations.is_empty());

    let selectors: Vec<_> = snapshot.elements.iter().map(|e| e.selector.as_str()).collect();
    assert!(selectors.contains(&"#ad-top"));
    assert!(selectors.contains(&"aside.sidebar"));
}

#[tokio::test]
async fn test_snapshot_structure_and_theme() {
    let doc = news_page();
    let snapshot = doc.snapshot().await.unwrap();
    assert_eq!(snapshot.structure.main_content_selector, "main");
    assert!(snapshot.structure.has_navigation);
    assert!(snapshot.structure.has_sidebar);
    assert!(snapshot.structure.has_footer);
    assert_eq!(snapshot.structure.container_type, "full-width");
    assert_eq!(snapshot.theme, Theme::Light);

    let dark = InMemoryDocument::from_fixture(PageFixture::new(
        "https://example.com/",
        "",
        PageNode::new("body")
            .with_attr("data-theme", "dark")
            .with_child(PageNode::new("div").with_class("wrapper")),
    ))
    .unwrap();
    let snapshot = dark.snapshot().await.unwrap();
    assert_eq!(snapshot.theme, Theme::Dark);
    assert_eq!(snapshot.structure.container_type, "contained");
    assert_eq!(snapshot.structure.main_content_selector, "body");
}

#[tokio::test]
async fn test_generated_selectors_are_unique() {
    let doc = news_page();
    let snapshot = doc.snapshot().await.unwrap();
    for element in &snapshot.elements {
        let matches = doc.query_selector_all(&element.selector).unwrap();
        assert_eq!(matches.len(), 1, "selector {} is ambiguous", element.selector);
    }
}
