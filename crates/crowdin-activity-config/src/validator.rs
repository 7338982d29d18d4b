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

    /// Turn the first error, if any, into a [`ConfigError::InvalidValue`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
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

        Self::validate_browser(config, &mut result);
        Self::validate_feed(config, &mut result);
        Self::validate_selectors(config, &mut result);
        Self::validate_normalizer(config, &mut result);

        Ok(result)
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Port cannot be 0",
            ));
        }

        if config.browser.window_width == 0 || config.browser.window_height == 0 {
            result.add_error(ValidationError::new(
                "browser.window_width",
                "Window dimensions must be greater than 0",
            ));
        }

        if let Some(ref path) = config.browser.chrome_path {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "browser.chrome_path",
                    format!("Chrome binary does not exist: {:?}", path),
                ));
            }
        }
    }

    fn validate_feed(config: &Config, result: &mut ValidationResult) {
        let feed = &config.feed;

        if !feed.base_url.starts_with("http://") && !feed.base_url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "feed.base_url",
                "base_url must start with http:// or https://",
            ));
        }

        if feed.wait_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "feed.wait_timeout_ms",
                "wait_timeout_ms must be greater than 0",
            ));
        }

        if feed.poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "feed.poll_interval_ms",
                "poll_interval_ms must be greater than 0",
            ));
        } else if feed.poll_interval_ms >= feed.wait_timeout_ms {
            result.add_warning(ValidationWarning::new(
                "feed.poll_interval_ms",
                "poll_interval_ms is not smaller than wait_timeout_ms, each wait polls only once",
            ));
        }
    }

    fn validate_selectors(config: &Config, result: &mut ValidationResult) {
        for (path, selector) in config.selectors.entries() {
            if selector.trim().is_empty() {
                result.add_error(ValidationError::new(path, "Selector cannot be empty"));
            }
        }
    }

    fn validate_normalizer(config: &Config, result: &mut ValidationResult) {
        let root = &config.normalizer.translations_root;
        if root.is_empty() {
            result.add_error(ValidationError::new(
                "normalizer.translations_root",
                "translations_root cannot be empty",
            ));
        } else if !root.starts_with('/') {
            result.add_warning(ValidationWarning::new(
                "normalizer.translations_root",
                "translations_root does not start with '/', file paths in the feed are absolute",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
