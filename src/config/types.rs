//! Configuration types and CLI options.
//!
//! This module defines the library configuration struct and the clap-derived
//! command-line options that are converted into it.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_PORTS, DEFAULT_RESOLUTION, DEFAULT_SCAN_TIMEOUT_MS,
    DEFAULT_SCREENSHOT_TIMEOUT_MS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use webscout::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     input: PathBuf::from("hosts.txt"),
///     out_dir: PathBuf::from("./out"),
///     ports: "small".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// File to read hosts/URLs from (`-` for stdin)
    pub input: PathBuf,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Existing directory receiving artifacts and the run summary
    pub out_dir: PathBuf,

    /// Maximum concurrently running units of work
    pub threads: usize,

    /// Port selection (named set or comma-separated list)
    pub ports: String,

    /// TCP connect timeout for port scanning in milliseconds
    pub scan_timeout_ms: u64,

    /// HTTP request (and TLS probe) timeout in milliseconds
    pub http_timeout_ms: u64,

    /// Hard deadline per screenshot in milliseconds
    pub screenshot_timeout_ms: u64,

    /// Proxy URL used for HTTP requests and the browser
    pub proxy: Option<String>,

    /// Browser binary override
    pub chrome_path: Option<PathBuf>,

    /// Browser viewport (`width,height`)
    pub resolution: String,

    /// Persist response bodies to `html/`
    pub save_body: bool,

    /// Capture screenshots (requires a browser)
    pub screenshots: bool,

    /// Fingerprint ruleset path (bundled ruleset when unset)
    pub fingerprints: Option<PathBuf>,
}

impl Config {
    /// TCP connect timeout for the port scanner.
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_millis(self.scan_timeout_ms)
    }

    /// HTTP request and TLS handshake timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    /// Screenshot deadline.
    pub fn screenshot_timeout(&self) -> Duration {
        Duration::from_millis(self.screenshot_timeout_ms)
    }
}

/// Number of logical CPUs, used as the default worker count.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("-"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            out_dir: PathBuf::from("."),
            threads: default_threads(),
            ports: DEFAULT_PORTS.to_string(),
            scan_timeout_ms: DEFAULT_SCAN_TIMEOUT_MS,
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            screenshot_timeout_ms: DEFAULT_SCREENSHOT_TIMEOUT_MS,
            proxy: None,
            chrome_path: None,
            resolution: DEFAULT_RESOLUTION.to_string(),
            save_body: true,
            screenshots: true,
            fingerprints: None,
        }
    }
}

/// Command-line options.
#[derive(Debug, Parser)]
#[command(
    name = "webscout",
    version,
    about = "Scans hosts for web services, screenshots them and flags takeover candidates"
)]
pub struct Opt {
    /// File with one host or URL per line (`-` reads stdin)
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// Output directory (must exist)
    #[arg(long, short = 'o', default_value = ".")]
    pub out: PathBuf,

    /// Number of concurrent workers (0 = number of logical CPUs)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Ports to scan: small, medium, large, xlarge or a comma-separated list
    #[arg(long, default_value = DEFAULT_PORTS)]
    pub ports: String,

    /// Port scan timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_SCAN_TIMEOUT_MS)]
    pub scan_timeout: u64,

    /// HTTP request timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_MS)]
    pub http_timeout: u64,

    /// Screenshot timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_SCREENSHOT_TIMEOUT_MS)]
    pub screenshot_timeout: u64,

    /// Proxy to use for HTTP requests and screenshots
    #[arg(long)]
    pub proxy: Option<String>,

    /// Full path to the Chrome/Chromium executable
    #[arg(long)]
    pub chrome_path: Option<PathBuf>,

    /// Screenshot resolution (`width,height`)
    #[arg(long, default_value = DEFAULT_RESOLUTION)]
    pub resolution: String,

    /// Do not save response bodies
    #[arg(long)]
    pub no_body: bool,

    /// Do not take screenshots
    #[arg(long)]
    pub no_screenshots: bool,

    /// Technology fingerprint ruleset (JSON)
    #[arg(long)]
    pub fingerprints: Option<PathBuf>,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            input: opt.input,
            log_level: opt.log_level,
            log_format: opt.log_format,
            out_dir: opt.out,
            threads: if opt.threads == 0 {
                default_threads()
            } else {
                opt.threads
            },
            ports: opt.ports,
            scan_timeout_ms: opt.scan_timeout,
            http_timeout_ms: opt.http_timeout,
            screenshot_timeout_ms: opt.screenshot_timeout,
            proxy: opt.proxy.filter(|p| !p.is_empty()),
            chrome_path: opt.chrome_path,
            resolution: opt.resolution,
            save_body: !opt.no_body,
            screenshots: !opt.no_screenshots,
            fingerprints: opt.fingerprints,
        }
    }
}
