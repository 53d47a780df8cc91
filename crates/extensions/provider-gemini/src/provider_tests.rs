use super::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn provider(server: &MockServer) -> GeminiProvider {
    GeminiProvider::with_endpoint(
        format!("{}/v1beta/models", server.uri()),
        "gemini-test",
        Duration::from_secs(5),
    )
    .unwrap()
    .with_api_key(Some("test-key".to_string()))
    .with_sampling(GenerationConfig {
        temperature: Some(0.2),
        max_output_tokens: Some(2000),
        top_p: Some(0.95),
        top_k: Some(40),
    })
}

#[tokio::test]
async fn test_generate_returns_trimmed_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-test:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "make headings blue"}]}],
            "generationConfig": {"maxOutputTokens": 2000, "topK": 40}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "\n h1 { color: blue; } \n"}]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server).await;
    let text = provider.generate("make headings blue").await.unwrap();
    assert_eq!(text, "h1 { color: blue; }");
}

#[tokio::test]
async fn test_api_error_uses_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
        })))
        .mount(&server)
        .await;

    let err = provider(&server).await.generate("x").await.unwrap_err();
    match err {
        GenerationError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_api_error_body_is_truncated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("e".repeat(1000)))
        .mount(&server)
        .await;

    let err = provider(&server).await.generate("x").await.unwrap_err();
    match err {
        GenerationError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message.len(), 300);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_blocked_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let err = provider(&server).await.generate("x").await.unwrap_err();
    assert!(matches!(err, GenerationError::Blocked(reason) if reason == "SAFETY"));
}

#[tokio::test]
async fn test_missing_text_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"finishReason": "MAX_TOKENS"}]
        })))
        .mount(&server)
        .await;

    let err = provider(&server).await.generate("x").await.unwrap_err();
    assert!(matches!(err, GenerationError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_missing_key_skips_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = provider(&server).await.with_api_key(None);
    assert!(!provider.has_credentials());
    let err = provider.generate("x").await.unwrap_err();
    assert!(matches!(err, GenerationError::MissingApiKey));
}

#[test]
fn test_set_credentials() {
    let provider = GeminiProvider::new(GeminiProvider::DEFAULT_MODEL).unwrap();
    assert!(!provider.has_credentials());
    provider.set_credentials("abc".to_string());
    assert!(provider.has_credentials());
    provider.set_credentials(String::new());
    assert!(!provider.has_credentials());
    assert_eq!(provider.model(), "gemini-2.5-flash-lite");
}
