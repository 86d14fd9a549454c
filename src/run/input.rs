//! Feeding input targets into the pipeline.

use log::{info, warn};

use super::resources::TargetSource;
use crate::app::{parse_target, Target};
use crate::events::{Event, EventBus};

/// Reads every target line and publishes its entry event.
///
/// Returns the number of targets published.
pub async fn feed_targets(source: TargetSource, bus: &EventBus) -> usize {
    let mut lines = source.lines();
    let mut published = 0usize;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read line from input: {e}");
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_target(trimmed) {
            Some(Target::Url(url)) => bus.publish(Event::UrlClassified(url)),
            Some(Target::Host(host)) => bus.publish(Event::HostDiscovered(host)),
            None => continue,
        }
        published += 1;
    }
    info!("Loaded {} target(s)", published);
    published
}
