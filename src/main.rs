//! crowdin-activity: export a Crowdin project's activity stream to CSV.

mod cli;

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use crowdin_activity_browser::{BrowserError, BrowserSession};
use crowdin_activity_config::{Config, ConfigError, ConfigValidator, LoggingConfig};
use crowdin_activity_core::export::export_csv;
use crowdin_activity_core::{activity_stream_url, run_feed, ActivityRow, FeedError};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use url::Url;

use crate::cli::Cli;

/// Failures that end a run.
#[derive(Debug, Error)]
enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Feed(#[from] FeedError),
}

impl AppError {
    fn exit_code(&self) -> u8 {
        match self {
            AppError::Feed(e) => e.stage().exit_code(),
            AppError::Config(_) | AppError::Browser(_) => 1,
        }
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&logging.level))?;

    let file_layer = match &logging.log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("crowdin-activity")
                .filename_suffix("log")
                .max_log_files(30)
                .build(log_dir)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Flushes buffered lines when the process exits.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(
                fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(1);
        }
    };

    if let Err(e) = init_tracing(&config.logging) {
        eprintln!("Error: failed to initialize logging: {}", e);
        return ExitCode::from(1);
    }

    let start = Instant::now();
    match run(&cli, &config).await {
        Ok(()) => {
            println!("Done.");
            println!("Duration: {:?}", start.elapsed());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    for warning in ConfigValidator::validate(config)?.into_result()? {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    let url = activity_stream_url(&config.feed.base_url, &cli.project)?;
    info!("Exporting activity stream of '{}' to {}", cli.project, cli.output.display());

    let session = BrowserSession::open(&config.browser).await?;
    let collected = collect_rows(&session, &url, config).await;
    if let Err(e) = session.close().await {
        warn!("Failed to release browser session: {}", e);
    }

    let rows = collected?;
    export_csv(&cli.output, &rows)?;
    Ok(())
}

async fn collect_rows(
    session: &BrowserSession,
    url: &Url,
    config: &Config,
) -> Result<Vec<ActivityRow>, AppError> {
    let feed = session.open_feed(url).await?;
    let feed_run = run_feed(&feed, config).await?;

    info!(
        cycles = feed_run.paging.cycles,
        details = feed_run.expansion.activated,
        rows = feed_run.rows.len(),
        skipped = feed_run.skipped.len(),
        "Activity stream collected"
    );
    Ok(feed_run.rows)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_exit_codes_follow_stage() {
        let paging = AppError::from(FeedError::NoNewContentDetected {
            position: 41,
            timeout: Duration::from_secs(5),
        });
        assert_eq!(paging.exit_code(), 2);

        let extraction = AppError::from(FeedError::MissingListContainer(
            ".user-activities".to_string(),
        ));
        assert_eq!(extraction.exit_code(), 4);

        let browser = AppError::from(BrowserError::ChromeNotFound);
        assert_eq!(browser.exit_code(), 1);
    }
}
