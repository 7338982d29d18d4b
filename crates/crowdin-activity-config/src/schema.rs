//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub selectors: SelectorConfig,

    #[serde(default)]
    pub normalizer: NormalizerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chrome launch and attach options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Remote debugging port. An already-running Chrome on this port is reused.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    #[serde(default = "default_true")]
    pub no_sandbox: bool,

    #[serde(default = "default_true")]
    pub disable_dev_shm_usage: bool,

    /// Explicit Chrome binary; otherwise well-known install paths are probed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_dir: Option<PathBuf>,

    #[serde(default = "default_launch_timeout_ms")]
    pub launch_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            headless: true,
            window_width: default_window_width(),
            window_height: default_window_height(),
            no_sandbox: true,
            disable_dev_shm_usage: true,
            chrome_path: None,
            profile_dir: None,
            launch_timeout_ms: default_launch_timeout_ms(),
        }
    }
}

impl BrowserConfig {
    /// Get the profile directory, falling back to `~/.crowdin-activity/browser-profile`.
    pub fn get_profile_dir(&self) -> PathBuf {
        self.profile_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".crowdin-activity")
                .join("browser-profile")
        })
    }

    /// Get the CDP endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("http://localhost:{}", self.debug_port)
    }

    pub fn launch_timeout(&self) -> Duration {
        Duration::from_millis(self.launch_timeout_ms)
    }
}

fn default_true() -> bool {
    true
}

fn default_debug_port() -> u16 {
    9222
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_launch_timeout_ms() -> u64 {
    6000
}

/// What to do with an activity item whose markup cannot be turned into a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedItemPolicy {
    /// Fail the whole run; nothing is written.
    #[default]
    Abort,
    /// Log a warning and leave the item out of the export.
    Skip,
}

impl std::str::FromStr for MalformedItemPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown policy '{}', expected abort or skip", other)),
        }
    }
}

/// Feed location and interaction timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound for every wait in the paging loop.
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Pause after each detail activation so the panel can render.
    #[serde(default = "default_detail_settle_ms")]
    pub detail_settle_ms: u64,

    #[serde(default)]
    pub on_malformed_item: MalformedItemPolicy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            wait_timeout_ms: default_wait_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            detail_settle_ms: default_detail_settle_ms(),
            on_malformed_item: MalformedItemPolicy::default(),
        }
    }
}

impl FeedConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn detail_settle(&self) -> Duration {
        Duration::from_millis(self.detail_settle_ms)
    }
}

fn default_base_url() -> String {
    "https://crowdin.com".to_string()
}

fn default_wait_timeout_ms() -> u64 {
    5000
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_detail_settle_ms() -> u64 {
    200
}

/// CSS selectors the exporter relies on. Treated as a versioned contract with
/// the activity stream markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_load_more")]
    pub load_more: String,

    /// Marker rendered once the project's creation entry is on the page.
    #[serde(default = "default_history_start")]
    pub history_start: String,

    #[serde(default = "default_items")]
    pub items: String,

    #[serde(default = "default_list_container")]
    pub list_container: String,

    #[serde(default = "default_user_link")]
    pub user_link: String,

    #[serde(default = "default_detail_control")]
    pub detail_control: String,

    /// Relative to an activity item.
    #[serde(default = "default_detail_rows")]
    pub detail_rows: String,

    /// Relative to a detail row.
    #[serde(default = "default_detail_file")]
    pub detail_file: String,

    #[serde(default = "default_inline_file")]
    pub inline_file: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            load_more: default_load_more(),
            history_start: default_history_start(),
            items: default_items(),
            list_container: default_list_container(),
            user_link: default_user_link(),
            detail_control: default_detail_control(),
            detail_rows: default_detail_rows(),
            detail_file: default_detail_file(),
            inline_file: default_inline_file(),
        }
    }
}

impl SelectorConfig {
    /// All selectors with their config paths, for validation.
    pub fn entries(&self) -> [(&'static str, &str); 9] {
        [
            ("selectors.load_more", &self.load_more),
            ("selectors.history_start", &self.history_start),
            ("selectors.items", &self.items),
            ("selectors.list_container", &self.list_container),
            ("selectors.user_link", &self.user_link),
            ("selectors.detail_control", &self.detail_control),
            ("selectors.detail_rows", &self.detail_rows),
            ("selectors.detail_file", &self.detail_file),
            ("selectors.inline_file", &self.inline_file),
        ]
    }
}

fn default_load_more() -> String {
    "#more_activity_btn".to_string()
}

fn default_history_start() -> String {
    "li.create_project".to_string()
}

fn default_items() -> String {
    "#activity-stream > div > ul > li".to_string()
}

fn default_list_container() -> String {
    ".user-activities".to_string()
}

fn default_user_link() -> String {
    "a.user-link".to_string()
}

fn default_detail_control() -> String {
    ".details_btn".to_string()
}

fn default_detail_rows() -> String {
    "div > table > tbody > tr".to_string()
}

fn default_detail_file() -> String {
    ".sub-list-acitity-file".to_string()
}

fn default_inline_file() -> String {
    "span.filename".to_string()
}

/// Article name normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Path prefix under which translated files live.
    #[serde(default = "default_translations_root")]
    pub translations_root: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            translations_root: default_translations_root(),
        }
    }
}

fn default_translations_root() -> String {
    "/translations".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for daily-rolling log files. Console only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_dir: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
