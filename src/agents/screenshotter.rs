//! Screenshot capture with a headless browser.
//!
//! Every invocation gets its own profile directory under one run-scoped
//! temporary root. The root is removed when the run ends; per-invocation
//! directories are removed as soon as their invocation finishes.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use colored::Colorize;
use log::{debug, error, info};
use tempfile::TempDir;

use super::browser::{check_browser_version, locate_browser, BrowserProcess, ProcessOutcome};
use super::{Agent, PipelineContext};
use crate::config::{BROWSER_TEMP_PREFIX, SCREENSHOTS_DIR};
use crate::error_handling::ScreenshotError;
use crate::events::{Event, Topic};
use crate::session::{Counter, Page};
use crate::user_agent::random_user_agent;
use crate::utils::wait_for_file;

pub struct Screenshotter {
    ctx: Arc<PipelineContext>,
    browser: PathBuf,
    temp_root_path: PathBuf,
    temp_root: Mutex<Option<TempDir>>,
}

impl Screenshotter {
    /// Locates the browser and creates the temporary profile root.
    ///
    /// # Errors
    ///
    /// Returns a `ScreenshotError` if no browser is usable or the temporary root
    /// cannot be created.
    pub async fn new(ctx: Arc<PipelineContext>) -> Result<Self, ScreenshotError> {
        let browser = locate_browser(ctx.config.chrome_path.as_deref())?;
        check_browser_version(&browser).await;
        debug!("Located Chrome/Chromium binary at {}", browser.display());

        let temp_root = tempfile::Builder::new()
            .prefix(BROWSER_TEMP_PREFIX)
            .tempdir()
            .map_err(ScreenshotError::TempDirFailed)?;
        debug!(
            "Created temporary user directory at: {}",
            temp_root.path().display()
        );

        Ok(Screenshotter {
            ctx,
            browser,
            temp_root_path: temp_root.path().to_path_buf(),
            temp_root: Mutex::new(Some(temp_root)),
        })
    }

    async fn on_url_responsive(&self, url: String) {
        let Some(page) = self.ctx.page_for(self.id(), &url) else {
            return;
        };
        self.screenshot_page(&page).await;
    }

    async fn screenshot_page(&self, page: &Page) {
        let stats = self.ctx.session.stats();
        let relative = PathBuf::from(SCREENSHOTS_DIR).join(format!("{}.png", page.base_filename()));
        let output = self.ctx.session.artifact_path(&relative);

        // Removed when this invocation returns
        let profile = match tempfile::Builder::new()
            .prefix("profile-")
            .tempdir_in(&self.temp_root_path)
        {
            Ok(dir) => dir,
            Err(e) => {
                stats.increment(Counter::ScreenshotFailed);
                error!("{}: screenshot failed: {}", page.url(), e);
                return;
            }
        };

        let args = browser_args(
            profile.path(),
            random_user_agent(),
            &self.ctx.config.resolution,
            &output,
            self.ctx.config.proxy.as_deref(),
            page.url().as_str(),
        );

        let mut process = match BrowserProcess::start(&self.browser, &args) {
            Ok(process) => process,
            Err(e) => {
                debug!("[{}] Error: {}", self.id(), e);
                stats.increment(Counter::ScreenshotFailed);
                error!("{}: screenshot failed: {}", page.url(), e);
                return;
            }
        };

        let timeout = self.ctx.config.screenshot_timeout();
        match process.wait_with_deadline(timeout).await {
            ProcessOutcome::Exited(status) if status.success() => {
                stats.increment(Counter::ScreenshotSucceeded);
                info!("{}: {}", page.url(), "screenshot successful".green());
                page.set_screenshot(&relative);
                if !wait_for_file(&output, timeout).await {
                    error!("Error: file {:?} not saved", relative);
                }
            }
            ProcessOutcome::Exited(status) => {
                stats.increment(Counter::ScreenshotFailed);
                error!("{}: screenshot failed: browser exited with {}", page.url(), status);
            }
            ProcessOutcome::Failed(e) => {
                debug!("[{}] Error: {}", self.id(), e);
                stats.increment(Counter::ScreenshotFailed);
                error!("{}: screenshot failed: {}", page.url(), e);
            }
            ProcessOutcome::TimedOut => {
                stats.increment(Counter::ScreenshotFailed);
                error!("{}: screenshot timed out", page.url());
            }
        }
    }

    fn on_run_ending(&self) {
        debug!("[{}] Received RunEnding event", self.id());
        let root = self
            .temp_root
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(root) = root {
            let path = root.path().to_path_buf();
            match root.close() {
                Ok(()) => debug!("Deleted temporary user directory at: {}", path.display()),
                Err(e) => debug!("Failed to delete {}: {}", path.display(), e),
            }
        }
    }
}

impl Agent for Screenshotter {
    fn id(&self) -> &'static str {
        "agent:screenshotter"
    }

    fn register(self: Arc<Self>, ctx: &PipelineContext) {
        let agent = Arc::clone(&self);
        ctx.bus.subscribe(Topic::UrlResponsive, move |event| {
            let agent = Arc::clone(&agent);
            async move {
                if let Event::UrlResponsive(url) = event {
                    agent.on_url_responsive(url).await;
                }
            }
        });
        ctx.bus.subscribe(Topic::RunEnding, move |_| {
            let agent = Arc::clone(&self);
            async move { agent.on_run_ending() }
        });
    }
}

/// Command line for one headless screenshot of `url`.
pub fn browser_args(
    profile_dir: &Path,
    user_agent: &str,
    resolution: &str,
    output: &Path,
    proxy: Option<&str>,
    url: &str,
) -> Vec<String> {
    let mut args: Vec<String> = [
        "--headless",
        "--disable-gpu",
        "--hide-scrollbars",
        "--mute-audio",
        "--disable-notifications",
        "--no-first-run",
        "--disable-crash-reporter",
        "--ignore-certificate-errors",
        "--incognito",
        "--disable-infobars",
        "--disable-sync",
        "--no-default-browser-check",
        "--no-sandbox",
    ]
    .iter()
    .map(|flag| flag.to_string())
    .collect();
    args.push(format!("--user-data-dir={}", profile_dir.display()));
    args.push(format!("--user-agent={user_agent}"));
    args.push(format!("--window-size={resolution}"));
    args.push(format!("--screenshot={}", output.display()));
    if let Some(proxy) = proxy {
        args.push(format!("--proxy-server={proxy}"));
    }
    args.push(url.to_string());
    args
}
