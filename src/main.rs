//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `webscout` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use webscout::config::Opt;
use webscout::initialization::{init_crypto_provider, init_logger_with};
use webscout::{run_pipeline, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from(Opt::parse());

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // Must happen before any rustls config is built
    init_crypto_provider();

    match run_pipeline(config).await {
        Ok(report) => {
            println!(
                "✅ {} page{} ({} responsive, {} screenshots, {} takeover candidates) in {:.1}s",
                report.pages,
                if report.pages == 1 { "" } else { "s" },
                report.responsive_urls,
                report.screenshots,
                report.takeovers,
                report.elapsed_seconds
            );
            println!("Results saved in {}", report.session_path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("webscout error: {:#}", e);
            process::exit(1);
        }
    }
}
