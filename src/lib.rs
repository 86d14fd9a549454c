//! webscout library: event-driven web service reconnaissance
//!
//! This library scans hosts for open web ports, classifies them as HTTP or
//! HTTPS, fetches and stores every response, screenshots pages with a headless
//! browser, fingerprints the technology stack and flags subdomain takeover
//! candidates.
//!
//! # Example
//!
//! ```no_run
//! use webscout::{run_pipeline, Config};
//! use tokio;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     input: std::path::PathBuf::from("hosts.txt"),
//!     out_dir: std::path::PathBuf::from("./out"),
//!     ports: "large".to_string(),
//!     ..Default::default()
//! };
//!
//! let report = run_pipeline(config).await?;
//! println!("{} responsive URLs, {} takeover candidates",
//!          report.responsive_urls, report.takeovers);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod agents;
mod app;
pub mod config;
pub mod error_handling;
pub mod events;
pub mod fingerprint;
pub mod initialization;
pub mod limiter;
mod parse;
mod run;
pub mod session;
pub mod takeover;
pub mod tls;
mod user_agent;
mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use run::{run_pipeline, RunReport, SessionSummary};
