//! Configuration constants.
//!
//! This module defines the constants used throughout the pipeline, including
//! default timeouts, artifact locations and output file names.

use std::time::Duration;

/// Default TCP connect timeout for the port scanner, in milliseconds
pub const DEFAULT_SCAN_TIMEOUT_MS: u64 = 100;
/// Default HTTP request timeout, in milliseconds
/// Also bounds the TLS handshake used to classify non-standard ports
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 3_000;
/// Default hard deadline for one browser screenshot, in milliseconds
pub const DEFAULT_SCREENSHOT_TIMEOUT_MS: u64 = 30_000;
/// Default browser viewport (`width,height`)
pub const DEFAULT_RESOLUTION: &str = "1440,900";
/// Default port selection
pub const DEFAULT_PORTS: &str = "medium";

// Artifact durability polling
/// Interval between existence checks after writing an artifact
pub const FILE_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// How long the HTTP requester waits for header/body artifacts to appear
pub const ARTIFACT_SAVE_TIMEOUT: Duration = Duration::from_secs(30);

// Output layout
/// Directory (under the output directory) holding response headers
pub const HEADERS_DIR: &str = "headers";
/// Directory (under the output directory) holding response bodies
pub const HTML_DIR: &str = "html";
/// Directory (under the output directory) holding screenshots
pub const SCREENSHOTS_DIR: &str = "screenshots";
/// Run summary written at the end of the run
pub const SESSION_FILE_NAME: &str = "webscout_session.json";
/// Responsive URL list written at the end of the run
pub const URLS_FILE_NAME: &str = "webscout_urls.txt";

/// Prefix of the run-scoped temporary browser profile root
pub const BROWSER_TEMP_PREFIX: &str = "webscout-chrome";

/// Oldest Chromium major version known to screenshot HTTPS pages reliably
pub const MIN_RELIABLE_CHROMIUM_MAJOR: u32 = 72;

/// Well-known browser install locations, checked in order.
pub const BROWSER_PATHS: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-beta",
    "/usr/bin/google-chrome-unstable",
    "/usr/bin/chromium-browser",
    "/usr/bin/chromium",
    "/snap/bin/chromium",
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Google Chrome Canary.app/Contents/MacOS/Google Chrome Canary",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "C:/Program Files (x86)/Google/Chrome/Application/chrome.exe",
    "C:/Program Files/Google/Chrome/Application/chrome.exe",
];
