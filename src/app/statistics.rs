//! Final statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::session::{Counter, RunStats};

/// Prints every counter, then a one-line summary of the run.
///
/// Works with both plain and JSON log formats (log::info! handles formatting).
pub fn print_final_statistics(stats: &RunStats, pages: usize, elapsed_seconds: f64) {
    info!("Run statistics:");
    for counter in Counter::iter() {
        info!("   {}: {}", counter.as_str(), stats.get(counter));
    }
    print_simple_summary(
        pages,
        stats.get(Counter::RequestSucceeded),
        stats.get(Counter::ScreenshotSucceeded),
        elapsed_seconds,
    );
}

fn print_simple_summary(pages: usize, responsive: usize, screenshots: usize, elapsed_seconds: f64) {
    info!(
        "✅ Processed {} page{} ({} responses, {} screenshots) in {:.1}s",
        pages,
        if pages == 1 { "" } else { "s" },
        responsive,
        screenshots,
        elapsed_seconds
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_final_statistics_empty() {
        let stats = RunStats::new();
        // Should not panic without any recorded work
        print_final_statistics(&stats, 0, 0.0);
    }

    #[test]
    fn test_print_final_statistics_with_counts() {
        let stats = RunStats::new();
        stats.increment(Counter::PortOpen);
        stats.record_response(200);
        stats.increment(Counter::ScreenshotFailed);
        print_final_statistics(&stats, 1, 1.5);
    }
}
