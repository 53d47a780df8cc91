//! Lenient parsing of JSON embedded in generation responses.

use serde::de::DeserializeOwned;

use webtailor_protocols::error::PlanParseError;

const ZERO_WIDTH: &[char] = &['\u{feff}', '\u{200b}', '\u{200c}', '\u{200d}', '\u{2060}'];

/// Parse the JSON object carried by a generation response.
///
/// Accepts a bare object, an object inside a ```` ```json ```` or bare
/// code fence, or an object surrounded by prose. A byte-order mark or
/// zero-width characters anywhere in the text are ignored.
pub fn parse_json_response<T: DeserializeOwned>(response: &str) -> Result<T, PlanParseError> {
    let cleaned: String = response.chars().filter(|c| !ZERO_WIDTH.contains(c)).collect();
    let candidate = fenced_block(&cleaned).unwrap_or(cleaned.trim());

    let first_error = match serde_json::from_str(candidate) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Some(object) = outermost_braces(&cleaned) {
        if let Ok(value) = serde_json::from_str(object) {
            return Ok(value);
        }
    }

    Err(PlanParseError::new(first_error.to_string(), response))
}

/// Contents of the first code fence, preferring one tagged `json`.
fn fenced_block(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let body = &text[start + "```json".len()..];
        if let Some(end) = body.find("```") {
            return Some(body[..end].trim());
        }
    }

    let start = text.find("```")?;
    let body = &text[start + 3..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

fn outermost_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_bare_object() {
        let value: Value = parse_json_response(r#"{"reasoning": "r", "actions": []}"#).unwrap();
        assert_eq!(value["reasoning"], "r");
    }

    #[test]
    fn test_json_fence() {
        let text = "Here is the plan:\n```json\n{\"selected\": [\".ad\"]}\n```\nDone.";
        let value: Value = parse_json_response(text).unwrap();
        assert_eq!(value, json!({"selected": [".ad"]}));
    }

    #[test]
    fn test_bare_fence() {
        let text = "```\n{\"actions\": [{\"tool\": \"applyCSS\"}]}\n```";
        let value: Value = parse_json_response(text).unwrap();
        assert_eq!(value["actions"][0]["tool"], "applyCSS");
    }

    #[test]
    fn test_bom_and_zero_width_prefix() {
        let text = "\u{feff}\u{200b}{\"actions\": []}";
        let value: Value = parse_json_response(text).unwrap();
        assert_eq!(value["actions"], json!([]));
    }

    #[test]
    fn test_brace_extraction_fallback() {
        let text = "Sure! {\"reasoning\": \"hide ads\", \"actions\": []} Hope that helps.";
        let value: Value = parse_json_response(text).unwrap();
        assert_eq!(value["reasoning"], "hide ads");
    }

    #[test]
    fn test_unparseable_keeps_preview() {
        let text = "I cannot help with that request.";
        let err = parse_json_response::<Value>(text).unwrap_err();
        assert_eq!(err.preview, text);
    }

    #[test]
    fn test_typed_target() {
        #[derive(serde::Deserialize)]
        struct Selection {
            selected: Vec<String>,
        }
        let selection: Selection = parse_json_response("```json\n{\"selected\": [\"h1\", \"h2\"]}\n```").unwrap();
        assert_eq!(selection.selected, vec!["h1", "h2"]);
    }
}
