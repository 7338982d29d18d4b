//! BrowserSession: acquire, open the feed, release.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use crowdin_activity_config::BrowserConfig;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};
use url::Url;

use super::BrowserError;
use crate::cdp::{CdpClient, PageSession};
use crate::feed_page::CdpFeedPage;

const LAUNCH_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A connected browser with one page opened for the export.
///
/// [`close`](Self::close) closes the page and, if this session launched
/// Chrome, terminates it. Dropping an unclosed session still kills a
/// launched Chrome.
pub struct BrowserSession {
    client: CdpClient,
    page: PageSession,
    /// Chrome process handle (if we launched it).
    chrome: Option<Child>,
    released: bool,
}

impl BrowserSession {
    /// Find Chrome executable path.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// Command-line flags Chrome is launched with.
    pub(super) fn launch_args(config: &BrowserConfig, profile_dir: &Path) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", config.debug_port),
            format!("--user-data-dir={}", profile_dir.display()),
            format!("--window-size={},{}", config.window_width, config.window_height),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-background-networking".to_string(),
            "--disable-sync".to_string(),
        ];
        if config.headless {
            args.push("--headless=new".to_string());
        }
        if config.no_sandbox {
            args.push("--no-sandbox".to_string());
        }
        if config.disable_dev_shm_usage {
            args.push("--disable-dev-shm-usage".to_string());
        }
        args
    }

    /// Connect to Chrome, launching it first when nothing listens on the
    /// debugging port, and open a blank page.
    pub async fn open(config: &BrowserConfig) -> Result<Self, BrowserError> {
        let endpoint = config.endpoint();

        let chrome = if CdpClient::version(&endpoint).await.is_ok() {
            info!("Chrome already running on port {}", config.debug_port);
            None
        } else {
            info!("Chrome not running on port {}, launching...", config.debug_port);
            let mut child = Self::launch_chrome(config)?;
            if let Err(e) = Self::wait_until_listening(&endpoint, config.launch_timeout()).await {
                let _ = child.kill().await;
                return Err(e);
            }
            Some(child)
        };

        // A launched Chrome is killed on drop if anything below fails.
        let client = CdpClient::connect(&endpoint).await?;
        let page = client.new_page().await?;
        page.set_viewport(config.window_width, config.window_height)
            .await?;

        info!("Connected to Chrome at {}", endpoint);
        Ok(Self {
            client,
            page,
            chrome,
            released: false,
        })
    }

    fn launch_chrome(config: &BrowserConfig) -> Result<Child, BrowserError> {
        let chrome_path = config
            .chrome_path
            .clone()
            .or_else(Self::find_chrome)
            .ok_or(BrowserError::ChromeNotFound)?;
        let profile_dir = config.get_profile_dir();

        if let Err(e) = std::fs::create_dir_all(&profile_dir) {
            warn!("Failed to create profile directory: {}", e);
        }

        info!("Launching Chrome with profile at: {}", profile_dir.display());

        let child = Command::new(&chrome_path)
            .args(Self::launch_args(config, &profile_dir))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(format!("{}: {}", chrome_path.display(), e)))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(child)
    }

    async fn wait_until_listening(endpoint: &str, timeout: Duration) -> Result<(), BrowserError> {
        let start = Instant::now();
        loop {
            tokio::time::sleep(LAUNCH_POLL_INTERVAL).await;
            if CdpClient::version(endpoint).await.is_ok() {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(BrowserError::LaunchFailed(format!(
                    "Chrome did not open {} within {:?}",
                    endpoint, timeout
                )));
            }
        }
    }

    /// Navigate the session's page to `url` and hand it out as a feed page.
    pub async fn open_feed(&self, url: &Url) -> Result<CdpFeedPage<'_>, BrowserError> {
        self.page
            .navigate(url.as_str())
            .await
            .map_err(|e| BrowserError::NavigationFailed(e.to_string()))?;
        info!("Opened {}", url);
        Ok(CdpFeedPage::new(&self.page))
    }

    pub fn page(&self) -> &PageSession {
        &self.page
    }

    /// Release the page and any launched Chrome.
    pub async fn close(mut self) -> Result<(), BrowserError> {
        self.release().await
    }

    async fn release(&mut self) -> Result<(), BrowserError> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        let closed = self.client.close_page(self.page.target_id()).await;

        let Some(mut child) = self.chrome.take() else {
            debug!("Browser session released");
            return closed.map_err(BrowserError::from);
        };

        // The tab goes away with the process.
        if let Err(e) = closed {
            debug!("Failed to close page {}: {}", self.page.target_id(), e);
        }
        info!("Shutting down Chrome...");
        if let Err(e) = child.kill().await {
            warn!("Failed to kill Chrome: {}", e);
        }

        debug!("Browser session released");
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Some(child) = self.chrome.as_mut() {
            warn!("Browser session dropped without close, killing Chrome");
            let _ = child.start_kill();
        }
    }
}
