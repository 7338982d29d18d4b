//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern"));

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        Self::expand_paths(&mut config);
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to built-in defaults.
    ///
    /// Only use this for the implicit default location; an explicitly
    /// requested file that is missing should go through [`ConfigLoader::load`].
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in ENV_VAR.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    fn expand_paths(config: &mut Config) {
        for path in [
            &mut config.browser.chrome_path,
            &mut config.browser.profile_dir,
            &mut config.logging.log_dir,
        ]
        .into_iter()
        .flatten()
        {
            *path = PathBuf::from(Self::expand_path(&path.to_string_lossy()));
        }
    }

    /// Expand shell-style paths (e.g., `~/.config`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MalformedItemPolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.feed.wait_timeout_ms, 5000);
        assert_eq!(config.browser.debug_port, 9222);
    }

    #[test]
    fn test_expand_path() {
        let expanded = ConfigLoader::expand_path("~/.crowdin-activity");
        assert!(!expanded.starts_with('~'));
    }

    #[test]
    fn test_load_full_config() {
        let content = r##"
            [browser]
            debug_port = 9333
            headless = false

            [feed]
            base_url = "http://localhost:8000"
            wait_timeout_ms = 2500
            on_malformed_item = "skip"

            [selectors]
            load_more = "#older"

            [normalizer]
            translations_root = "/traducoes"
        "##;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.browser.debug_port, 9333);
        assert!(!config.browser.headless);
        assert_eq!(config.feed.base_url, "http://localhost:8000");
        assert_eq!(config.feed.wait_timeout_ms, 2500);
        assert_eq!(config.feed.on_malformed_item, MalformedItemPolicy::Skip);
        assert_eq!(config.selectors.load_more, "#older");
        assert_eq!(config.selectors.history_start, "li.create_project");
        assert_eq!(config.normalizer.translations_root, "/traducoes");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[feed]").unwrap();
        writeln!(file, "detail_settle_ms = 50").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.feed.detail_settle_ms, 50);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            ConfigLoader::load_or_default(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.feed.poll_interval_ms, 100);
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "invalid = [unclosed";
        let result = ConfigLoader::load_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_tilde_in_log_dir_is_expanded() {
        let config = ConfigLoader::load_str("[logging]\nlog_dir = \"~/logs\"").unwrap();
        let dir = config.logging.log_dir.unwrap();
        assert!(!dir.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("CROWDIN_ACTIVITY_TEST_BASE", "http://127.0.0.1:9000");
        }
        let content = "[feed]\nbase_url = \"${CROWDIN_ACTIVITY_TEST_BASE}\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.feed.base_url, "http://127.0.0.1:9000");
        unsafe {
            std::env::remove_var("CROWDIN_ACTIVITY_TEST_BASE");
        }
    }

    #[test]
    fn test_expand_env_vars_missing() {
        let content = "value = \"${CROWDIN_ACTIVITY_SURELY_UNSET_VAR}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }
}
