//! Error type definitions.
//!
//! This module defines the typed errors that abort a run before any work starts.
//! Unit-scoped failures (dial, HTTP, DNS, parse) are logged and counted where they
//! happen and never surface as these types.

use std::io;
use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error building the TLS configuration used to probe ports.
    #[error("TLS configuration error: {0}")]
    TlsConfigError(#[from] rustls::Error),
}

/// Invalid run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The output directory does not exist.
    #[error("Output directory does not exist: {0}")]
    OutputDirMissing(PathBuf),

    /// The output path exists but is not a directory.
    #[error("Output path is not a directory: {0}")]
    OutputDirNotDirectory(PathBuf),

    /// A port entry is not a number in `1..=65535`.
    #[error("Invalid port: {0:?}")]
    InvalidPort(String),

    /// The input file could not be read.
    #[error("Cannot read input {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Output subdirectories could not be created.
    #[error("Cannot create output directory {path}: {source}")]
    OutputDirCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Error types for technology fingerprint ruleset loading.
#[derive(Error, Debug)]
pub enum FingerprintError {
    /// The ruleset file could not be read.
    #[error("Cannot read fingerprint ruleset {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The ruleset is not a valid JSON array of rules.
    #[error("Invalid fingerprint ruleset: {0}")]
    ParseFailed(#[from] serde_json::Error),
}

/// Error types for screenshot capturer setup.
#[derive(Error, Debug)]
pub enum ScreenshotError {
    /// The configured browser path does not exist.
    #[error("Browser binary not found at {0}")]
    BrowserPathMissing(PathBuf),

    /// None of the well-known install locations holds a browser.
    #[error("No Chrome/Chromium installation found; install one or pass --chrome-path")]
    BrowserNotFound,

    /// The run-scoped profile directory could not be created.
    #[error("Cannot create browser profile directory: {0}")]
    TempDirFailed(#[source] io::Error),
}
