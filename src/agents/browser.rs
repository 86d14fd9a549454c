//! Headless browser discovery and process handling.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::LazyLock;
use std::time::Duration;

use log::{debug, warn};
use regex::Regex;
use tokio::process::{Child, Command};

use crate::config::{BROWSER_PATHS, MIN_RELIABLE_CHROMIUM_MAJOR};
use crate::error_handling::ScreenshotError;

static MAJOR_VERSION: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(\d+)\.").ok());

/// Finds the browser binary to screenshot with.
///
/// An explicit `override_path` must exist. Otherwise the first existing entry
/// of [`BROWSER_PATHS`] is used.
///
/// # Errors
///
/// `BrowserPathMissing` when the override does not exist, `BrowserNotFound`
/// when no well-known location has a browser.
pub fn locate_browser(override_path: Option<&Path>) -> Result<PathBuf, ScreenshotError> {
    if let Some(path) = override_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(ScreenshotError::BrowserPathMissing(path.to_path_buf()));
    }
    BROWSER_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .ok_or(ScreenshotError::BrowserNotFound)
}

/// Logs a warning when the browser is known to screenshot unreliably.
pub async fn check_browser_version(path: &Path) {
    if path.to_string_lossy().to_lowercase().contains("chrome") {
        warn!("Using unreliable Google Chrome for screenshots. Install Chromium for better results.");
        return;
    }

    let output = match Command::new(path).arg("--version").output().await {
        Ok(output) => output,
        Err(e) => {
            debug!("Running {} --version failed: {}", path.display(), e);
            warn!("An error occurred while trying to determine version of Chromium.");
            return;
        }
    };
    match major_version(&String::from_utf8_lossy(&output.stdout)) {
        Some(major) if major < MIN_RELIABLE_CHROMIUM_MAJOR => {
            warn!("An older version of Chromium is installed. Screenshotting of HTTPS URLs might be unreliable.");
        }
        Some(major) => debug!("Chromium major version {major}"),
        None => {
            warn!("Unable to determine version of Chromium. Screenshotting might be unreliable.");
        }
    }
}

fn major_version(version: &str) -> Option<u32> {
    MAJOR_VERSION
        .as_ref()?
        .captures(version)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// How a browser invocation ended.
#[derive(Debug)]
pub enum ProcessOutcome {
    Exited(ExitStatus),
    Failed(std::io::Error),
    TimedOut,
}

/// A running browser invocation.
///
/// The child is killed when the handle is dropped.
pub struct BrowserProcess {
    child: Child,
}

impl BrowserProcess {
    /// Spawns `program` with `args`, discarding its output.
    pub fn start(program: &Path, args: &[String]) -> std::io::Result<Self> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;
        Ok(BrowserProcess { child })
    }

    /// Waits for the process to exit, killing it once `deadline` passes.
    pub async fn wait_with_deadline(&mut self, deadline: Duration) -> ProcessOutcome {
        match tokio::time::timeout(deadline, self.child.wait()).await {
            Ok(Ok(status)) => ProcessOutcome::Exited(status),
            Ok(Err(e)) => ProcessOutcome::Failed(e),
            Err(_) => {
                self.kill().await;
                ProcessOutcome::TimedOut
            }
        }
    }

    pub async fn kill(&mut self) {
        if let Err(e) = self.child.kill().await {
            debug!("Failed to kill browser process: {e}");
        }
    }
}
