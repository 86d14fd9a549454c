//! Run statistics tracking.
//!
//! Thread-safe counters shared by every pipeline stage, plus the run's start and
//! end timestamps.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{EnumIter, IntoEnumIterator};

/// A counted pipeline outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Counter {
    PortOpen,
    PortClosed,
    RequestSucceeded,
    RequestFailed,
    Response2xx,
    Response3xx,
    Response4xx,
    Response5xx,
    ScreenshotSucceeded,
    ScreenshotFailed,
}

impl Counter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Counter::PortOpen => "Ports open",
            Counter::PortClosed => "Ports closed",
            Counter::RequestSucceeded => "Requests succeeded",
            Counter::RequestFailed => "Requests failed",
            Counter::Response2xx => "2xx responses",
            Counter::Response3xx => "3xx responses",
            Counter::Response4xx => "4xx responses",
            Counter::Response5xx => "5xx responses",
            Counter::ScreenshotSucceeded => "Screenshots succeeded",
            Counter::ScreenshotFailed => "Screenshots failed",
        }
    }

    /// Status bucket for an HTTP status code. Codes outside 200..=599 are not bucketed.
    pub fn for_status(code: u16) -> Option<Counter> {
        match code {
            200..=299 => Some(Counter::Response2xx),
            300..=399 => Some(Counter::Response3xx),
            400..=499 => Some(Counter::Response4xx),
            500..=599 => Some(Counter::Response5xx),
            _ => None,
        }
    }
}

impl std::fmt::Display for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thread-safe run statistics.
///
/// Every `Counter` is inserted at construction, so increments never allocate and
/// never miss.
pub struct RunStats {
    counters: HashMap<Counter, AtomicUsize>,
    started: Mutex<Option<DateTime<Utc>>>,
    finished: Mutex<Option<DateTime<Utc>>>,
}

/// Plain copy of the statistics, taken once the run has drained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub ports_open: usize,
    pub ports_closed: usize,
    pub requests_succeeded: usize,
    pub requests_failed: usize,
    pub responses_2xx: usize,
    pub responses_3xx: usize,
    pub responses_4xx: usize,
    pub responses_5xx: usize,
    pub screenshots_succeeded: usize,
    pub screenshots_failed: usize,
    pub started: Option<DateTime<Utc>>,
    pub finished: Option<DateTime<Utc>>,
}

impl RunStats {
    pub fn new() -> Self {
        let mut counters = HashMap::new();
        for counter in Counter::iter() {
            counters.insert(counter, AtomicUsize::new(0));
        }
        RunStats {
            counters,
            started: Mutex::new(None),
            finished: Mutex::new(None),
        }
    }

    pub fn increment(&self, counter: Counter) {
        if let Some(c) = self.counters.get(&counter) {
            c.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Counts a successful response and its status bucket.
    pub fn record_response(&self, status: u16) {
        self.increment(Counter::RequestSucceeded);
        if let Some(bucket) = Counter::for_status(status) {
            self.increment(bucket);
        }
    }

    pub fn get(&self, counter: Counter) -> usize {
        self.counters
            .get(&counter)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn mark_started(&self) {
        *self.started.lock().unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());
    }

    pub fn mark_finished(&self) {
        *self.finished.lock().unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());
    }

    /// Seconds between start and finish (or now, if still running).
    pub fn elapsed_seconds(&self) -> f64 {
        let started = *self.started.lock().unwrap_or_else(PoisonError::into_inner);
        let finished = *self.finished.lock().unwrap_or_else(PoisonError::into_inner);
        match started {
            Some(start) => {
                let end = finished.unwrap_or_else(Utc::now);
                (end - start).num_milliseconds() as f64 / 1000.0
            }
            None => 0.0,
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            ports_open: self.get(Counter::PortOpen),
            ports_closed: self.get(Counter::PortClosed),
            requests_succeeded: self.get(Counter::RequestSucceeded),
            requests_failed: self.get(Counter::RequestFailed),
            responses_2xx: self.get(Counter::Response2xx),
            responses_3xx: self.get(Counter::Response3xx),
            responses_4xx: self.get(Counter::Response4xx),
            responses_5xx: self.get(Counter::Response5xx),
            screenshots_succeeded: self.get(Counter::ScreenshotSucceeded),
            screenshots_failed: self.get(Counter::ScreenshotFailed),
            started: *self.started.lock().unwrap_or_else(PoisonError::into_inner),
            finished: *self.finished.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_all_counters_start_at_zero() {
        let stats = RunStats::new();
        for counter in Counter::iter() {
            assert_eq!(stats.get(counter), 0, "{counter}");
        }
    }

    #[test]
    fn test_record_response_buckets() {
        let stats = RunStats::new();
        stats.record_response(200);
        stats.record_response(204);
        stats.record_response(301);
        stats.record_response(404);
        stats.record_response(503);
        stats.record_response(101);

        assert_eq!(stats.get(Counter::RequestSucceeded), 6);
        assert_eq!(stats.get(Counter::Response2xx), 2);
        assert_eq!(stats.get(Counter::Response3xx), 1);
        assert_eq!(stats.get(Counter::Response4xx), 1);
        assert_eq!(stats.get(Counter::Response5xx), 1);
    }

    #[test]
    fn test_concurrent_increments() {
        let stats = Arc::new(RunStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        stats.increment(Counter::PortClosed);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(stats.get(Counter::PortClosed), 8000);
    }

    #[test]
    fn test_snapshot_timestamps() {
        let stats = RunStats::new();
        assert!(stats.snapshot().started.is_none());
        stats.mark_started();
        stats.mark_finished();
        let snap = stats.snapshot();
        assert!(snap.started.is_some());
        assert!(snap.finished >= snap.started);
        assert!(stats.elapsed_seconds() >= 0.0);
    }
}
