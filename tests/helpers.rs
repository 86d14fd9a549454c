// Shared test helpers for building pipeline contexts and input files.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;
use webscout::agents::PipelineContext;
use webscout::events::{Event, EventBus, Topic};
use webscout::fingerprint::FingerprintRuleset;
use webscout::initialization::{init_client, init_resolver};
use webscout::limiter::WorkLimiter;
use webscout::session::Session;
use webscout::tls::TlsProber;
use webscout::{Config, LogFormat, LogLevel};

/// Config for tests: quiet, short timeouts, no screenshots.
#[allow(dead_code)]
pub fn test_config(input: &Path, out_dir: &Path) -> Config {
    Config {
        input: input.to_path_buf(),
        log_level: LogLevel::Error,
        log_format: LogFormat::Plain,
        out_dir: out_dir.to_path_buf(),
        threads: 4,
        scan_timeout_ms: 500,
        http_timeout_ms: 2_000,
        screenshot_timeout_ms: 5_000,
        screenshots: false,
        ..Default::default()
    }
}

/// Builds a context with no agents registered.
#[allow(dead_code)]
pub fn test_context(out_dir: &Path, ports: Vec<u16>, threads: usize) -> Arc<PipelineContext> {
    let config = Config {
        threads,
        ..test_config(Path::new("-"), out_dir)
    };
    Arc::new(PipelineContext {
        session: Arc::new(Session::new(out_dir)),
        ports,
        client: init_client(config.http_timeout(), None).expect("client"),
        resolver: init_resolver(),
        prober: TlsProber::new(config.http_timeout()).expect("prober"),
        ruleset: Arc::new(FingerprintRuleset::bundled().expect("bundled ruleset")),
        bus: Arc::new(EventBus::new(WorkLimiter::new(threads))),
        config: Arc::new(config),
    })
}

/// Records every event published on `topic`.
#[allow(dead_code)]
pub fn collect(bus: &EventBus, topic: Topic) -> Arc<Mutex<Vec<Event>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    bus.subscribe(topic, move |event| {
        let sink = Arc::clone(&sink);
        async move {
            sink.lock().unwrap().push(event);
        }
    });
    seen
}

/// Writes one target per line to a temporary file.
#[allow(dead_code)]
pub fn write_targets(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    for line in lines {
        writeln!(file, "{}", line).expect("Failed to write target");
    }
    file.flush().expect("Failed to flush file");
    file
}
