use super::*;

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
}

#[test]
fn test_validate_empty_model() {
    let mut config = Config::default();
    config.generation.model = " ".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "generation.model"));
}

#[test]
fn test_validate_invalid_endpoint() {
    let mut config = Config::default();
    config.generation.endpoint = "generativelanguage.googleapis.com".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "generation.endpoint"));
}

#[test]
fn test_validate_zero_cap() {
    let mut config = Config::default();
    config.cache.max_rules_per_origin = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "cache.max_rules_per_origin"));
}

#[test]
fn test_validate_zero_ttl_and_staleness() {
    let mut config = Config::default();
    config.cache.context_ttl_ms = 0;
    config.cache.staleness_days = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert_eq!(result.errors.len(), 2);
}

#[test]
fn test_validate_zero_debounce() {
    let mut config = Config::default();
    config.watch.debounce_ms = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "watch.debounce_ms"));
}

#[test]
fn test_validate_empty_watch_targets_warns() {
    let mut config = Config::default();
    config.watch.significant_tags.clear();
    config.watch.significant_classes.clear();
    config.watch.significant_ids.clear();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "watch"));
}

#[test]
fn test_validate_temperature_warning() {
    let mut config = Config::default();
    config.generation.temperature = 3.5;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "generation.temperature"));
}

#[test]
fn test_into_result() {
    let mut config = Config::default();
    config.generation.api_key = Some("key".to_string());
    let warnings = ConfigValidator::validate(&config).unwrap().into_result().unwrap();
    assert!(warnings.is_empty());

    config.watch.debounce_ms = 0;
    let err = ConfigValidator::validate(&config).unwrap().into_result().unwrap_err();
    assert!(err.to_string().contains("watch.debounce_ms"));
}
