//! Pipeline run flow: initialize, feed targets, drain, finalize.

mod finalize;
mod init;
mod input;
mod resources;

use std::path::PathBuf;

use anyhow::Result;
use log::info;

use crate::config::Config;

pub use finalize::SessionSummary;

/// Results of a pipeline run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Number of target records created
    pub pages: usize,
    /// Number of URLs that returned an HTTP response
    pub responsive_urls: usize,
    /// Number of successful screenshots
    pub screenshots: usize,
    /// Number of pages tagged as takeover candidates
    pub takeovers: usize,
    /// Path of the JSON session summary
    pub session_path: PathBuf,
    /// Path of the responsive URL list
    pub urls_path: PathBuf,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Runs the pipeline with the provided configuration.
///
/// Reads targets from `config.input`, drives them through every stage and
/// writes the session summary into `config.out_dir`.
///
/// # Errors
///
/// Returns an error if initialization fails (invalid output directory, port
/// selection, input, ruleset or missing browser) or if the summary cannot be
/// written. Unit-level failures are logged and counted, never returned.
///
/// # Example
///
/// ```no_run
/// use webscout::{run_pipeline, Config};
/// use std::path::PathBuf;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config {
///     input: PathBuf::from("hosts.txt"),
///     screenshots: false,
///     ..Default::default()
/// };
/// let report = run_pipeline(config).await?;
/// println!("{} responsive URLs", report.responsive_urls);
/// # Ok(())
/// # }
/// ```
pub async fn run_pipeline(config: Config) -> Result<RunReport> {
    let resources = init::init_pipeline(config).await?;
    let ctx = resources.ctx;

    ctx.session.stats().mark_started();
    info!("Starting run with {} worker(s)", ctx.config.threads);
    input::feed_targets(resources.source, &ctx.bus).await;

    finalize::finalize_pipeline(&ctx).await
}
