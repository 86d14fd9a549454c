//! Run finalization.
//!
//! Drains the pipeline, lets stages tear down, and writes the session summary
//! and the responsive URL list.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;

use super::RunReport;
use crate::agents::PipelineContext;
use crate::app::print_final_statistics;
use crate::config::{SESSION_FILE_NAME, URLS_FILE_NAME};
use crate::events::Event;
use crate::session::{PageSummary, StatsSnapshot};
use crate::takeover::TAKEOVER_TAG;

/// JSON document written to the session file.
#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub version: &'static str,
    pub stats: StatsSnapshot,
    pub pages: Vec<PageSummary>,
}

/// Waits for all work, broadcasts `RunEnding`, and writes the run outputs.
///
/// # Errors
///
/// Returns an error if the session summary or URL list cannot be written.
pub async fn finalize_pipeline(ctx: &PipelineContext) -> Result<RunReport> {
    let limiter = ctx.bus.limiter();
    limiter.wait_for_drain().await;
    debug!("Pipeline drained, broadcasting RunEnding");
    ctx.bus.publish(Event::RunEnding);
    limiter.wait_for_drain().await;
    // Handlers hold the context, and the context holds the bus
    ctx.bus.clear();

    let stats = ctx.session.stats();
    stats.mark_finished();

    let pages: Vec<PageSummary> = ctx.session.pages().iter().map(|p| p.summary()).collect();
    let responsive_urls = ctx.session.responsive_urls();
    let screenshots = pages.iter().filter(|p| p.screenshot_ok).count();
    let takeovers = pages
        .iter()
        .filter(|p| p.tags.iter().any(|t| t.name == TAKEOVER_TAG))
        .count();

    let summary = SessionSummary {
        version: env!("CARGO_PKG_VERSION"),
        stats: stats.snapshot(),
        pages,
    };
    let page_count = summary.pages.len();

    let session_path: PathBuf = ctx.session.out_dir().join(SESSION_FILE_NAME);
    let json = serde_json::to_vec_pretty(&summary).context("Failed to serialize session")?;
    tokio::fs::write(&session_path, json)
        .await
        .with_context(|| format!("Failed to write {}", session_path.display()))?;

    let urls_path: PathBuf = ctx.session.out_dir().join(URLS_FILE_NAME);
    let mut urls = responsive_urls.join("\n");
    if !urls.is_empty() {
        urls.push('\n');
    }
    tokio::fs::write(&urls_path, urls)
        .await
        .with_context(|| format!("Failed to write {}", urls_path.display()))?;

    let elapsed_seconds = stats.elapsed_seconds();
    print_final_statistics(stats, page_count, elapsed_seconds);
    info!("Wrote session to {}", session_path.display());

    Ok(RunReport {
        pages: page_count,
        responsive_urls: responsive_urls.len(),
        screenshots,
        takeovers,
        session_path,
        urls_path,
        elapsed_seconds,
    })
}
