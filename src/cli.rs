//! CLI definitions for crowdin-activity.

use std::path::{Path, PathBuf};

use clap::Parser;
use crowdin_activity_config::{Config, ConfigError, ConfigLoader, MalformedItemPolicy};

/// Configuration file looked up when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "crowdin-activity.toml";

/// Export a Crowdin project's activity stream to CSV.
#[derive(Debug, Parser)]
#[command(name = "crowdin-activity")]
#[command(version)]
pub(crate) struct Cli {
    /// Project name as it appears in the project URL
    pub project: String,

    /// CSV file to write
    pub output: PathBuf,

    /// Configuration file path (defaults to ./crowdin-activity.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Chrome remote debugging port
    #[arg(long, env = "CROWDIN_ACTIVITY_DEBUG_PORT")]
    pub debug_port: Option<u16>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// What to do with an activity item that cannot be parsed: abort or skip
    #[arg(long, value_name = "POLICY")]
    pub on_malformed: Option<MalformedItemPolicy>,
}

impl Cli {
    /// Load the configuration and apply command-line overrides.
    pub(crate) fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load(path)?,
            None => ConfigLoader::load_or_default(Path::new(DEFAULT_CONFIG_PATH))?,
        };

        if let Some(port) = self.debug_port {
            config.browser.debug_port = port;
        }
        if self.headed {
            config.browser.headless = false;
        }
        if let Some(policy) = self.on_malformed {
            config.feed.on_malformed_item = policy;
        }
        Ok(config)
    }
}
