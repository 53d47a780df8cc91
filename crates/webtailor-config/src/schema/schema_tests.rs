use super::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.generation.model, "gemini-2.5-flash-lite");
    assert_eq!(config.cache.max_rules_per_origin, 10);
    assert_eq!(config.watch.debounce_ms, 2500);
    assert!(config.storage.path.ends_with(".webtailor/storage.json"));
}

#[test]
fn test_generation_config_default() {
    let generation = GenerationConfig::default();
    assert!(generation.endpoint.starts_with("https://"));
    assert!(generation.api_key.is_none());
    assert!((generation.temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(generation.max_output_tokens, 2000);
    assert_eq!(generation.top_k, 40);
    assert_eq!(generation.timeout_seconds, 60);
}

#[test]
fn test_cache_config_default() {
    let cache = CacheConfig::default();
    assert_eq!(cache.staleness_days, 30);
    assert_eq!(cache.context_ttl_ms, 15_000);
}

#[test]
fn test_watch_config_default() {
    let watch = WatchConfig::default();
    assert_eq!(watch.significant_tags, vec!["article", "section", "main"]);
    assert_eq!(watch.significant_classes, vec!["content", "post", "comments"]);
    assert_eq!(watch.significant_ids, vec!["comments"]);
}

#[test]
fn test_configured_api_key_wins() {
    let generation = GenerationConfig {
        api_key: Some("from-config".to_string()),
        ..Default::default()
    };
    assert_eq!(generation.resolve_api_key().as_deref(), Some("from-config"));
}

#[test]
fn test_blank_api_key_is_ignored() {
    let generation = GenerationConfig {
        api_key: Some("   ".to_string()),
        ..Default::default()
    };
    if std::env::var(API_KEY_ENV).is_err() {
        assert!(generation.resolve_api_key().is_none());
    }
}

#[test]
fn test_default_path() {
    assert!(Config::default_path().ends_with(".webtailor/config.toml"));
}

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("gemini-2.5-flash-lite"));
    assert!(json.contains("max_rules_per_origin"));
    assert!(!json.contains("api_key"));
}
