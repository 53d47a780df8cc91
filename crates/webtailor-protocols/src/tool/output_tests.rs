use super::*;
use serde_json::json;

#[test]
fn test_css_text_present() {
    let output = ToolOutput::new(json!({"css": "h1{color:blue}", "description": "D"}));
    assert_eq!(output.css_text(), Some("h1{color:blue}"));
    assert_eq!(output.description(), Some("D"));
}

#[test]
fn test_css_null_is_not_css_text() {
    let output = ToolOutput::new(json!({"css": null, "description": "No CSS generated"}));
    assert_eq!(output.css_text(), None);
}

#[test]
fn test_css_non_string_is_not_css_text() {
    let output = ToolOutput::new(json!({"css": ["a{}"]}));
    assert_eq!(output.css_text(), None);
}

#[test]
fn test_empty_description_is_absent() {
    let output = ToolOutput::new(json!({"css": "", "description": ""}));
    assert_eq!(output.css_text(), Some(""));
    assert_eq!(output.description(), None);
}

#[test]
fn test_non_object_output() {
    let output = ToolOutput::new(json!(["#ad", ".banner"]));
    assert_eq!(output.css_text(), None);
    assert_eq!(output.description(), None);
}

#[test]
fn test_transparent_serialization() {
    let output = ToolOutput::new(json!({"summary": "short"}));
    let text = serde_json::to_string(&output).unwrap();
    assert_eq!(text, r#"{"summary":"short"}"#);
    let back: ToolOutput = serde_json::from_str(&text).unwrap();
    assert_eq!(back, output);
}
