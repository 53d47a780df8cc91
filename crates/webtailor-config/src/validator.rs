//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_generation(config, &mut result);
        Self::validate_cache(config, &mut result);
        Self::validate_watch(config, &mut result);

        Ok(result)
    }

    fn validate_generation(config: &Config, result: &mut ValidationResult) {
        let generation = &config.generation;

        if generation.model.trim().is_empty() {
            result.add_error(ValidationError::new(
                "generation.model",
                "Model name cannot be empty",
            ));
        }

        if !generation.endpoint.starts_with("http://")
            && !generation.endpoint.starts_with("https://")
        {
            result.add_error(ValidationError::new(
                "generation.endpoint",
                "endpoint must start with http:// or https://",
            ));
        }

        if generation.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "generation.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }

        if !(0.0..=2.0).contains(&generation.temperature) {
            result.add_warning(ValidationWarning::new(
                "generation.temperature",
                "temperature outside 0.0..=2.0 will likely be rejected by the service",
            ));
        }

        if generation.resolve_api_key().is_none() {
            result.add_warning(ValidationWarning::new(
                "generation.api_key",
                "API key is not set, it must be stored with the apiKey storage key",
            ));
        }
    }

    fn validate_cache(config: &Config, result: &mut ValidationResult) {
        if config.cache.max_rules_per_origin == 0 {
            result.add_error(ValidationError::new(
                "cache.max_rules_per_origin",
                "max_rules_per_origin must be greater than 0",
            ));
        }

        if config.cache.staleness_days == 0 {
            result.add_error(ValidationError::new(
                "cache.staleness_days",
                "staleness_days must be greater than 0",
            ));
        }

        if config.cache.context_ttl_ms == 0 {
            result.add_error(ValidationError::new(
                "cache.context_ttl_ms",
                "context_ttl_ms must be greater than 0",
            ));
        }
    }

    fn validate_watch(config: &Config, result: &mut ValidationResult) {
        let watch = &config.watch;

        if watch.debounce_ms == 0 {
            result.add_error(ValidationError::new(
                "watch.debounce_ms",
                "debounce_ms must be greater than 0",
            ));
        }

        if watch.significant_tags.is_empty()
            && watch.significant_classes.is_empty()
            && watch.significant_ids.is_empty()
        {
            result.add_warning(ValidationWarning::new(
                "watch",
                "No significant tags, classes or ids: mutations will never trigger a replay",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
