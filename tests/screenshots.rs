//! Screenshot lifecycle tests with throwaway shell scripts standing in for the browser.
#![cfg(unix)]

mod helpers;

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use webscout::{run_pipeline, Config};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::{test_config, write_targets};

/// Writes an executable `fake-chromium` script whose behaviour after argument
/// parsing is `action`. The profile directory it was given is recorded next to it.
fn fake_browser(dir: &Path, action: &str) -> PathBuf {
    let script = format!(
        r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --version) echo "Chromium 120.0.6099.71"; exit 0;;
    --screenshot=*) out="${{arg#--screenshot=}}";;
    --user-data-dir=*) echo "${{arg#--user-data-dir=}}" > "{dir}/profile.txt";;
  esac
done
{action}
"#,
        dir = dir.display(),
        action = action
    );
    let path = dir.join("fake-chromium");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

async fn ok_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<title>x</title>", "text/html"))
        .mount(&server)
        .await;
    server
}

async fn run_with_browser(browser: PathBuf, timeout_ms: u64) -> (tempfile::TempDir, Value) {
    let server = ok_server().await;
    let out = tempfile::tempdir().unwrap();
    let input = write_targets(&[format!("{}/", server.uri())]);
    let config = Config {
        screenshots: true,
        chrome_path: Some(browser),
        screenshot_timeout_ms: timeout_ms,
        ..test_config(input.path(), out.path())
    };
    run_pipeline(config).await.unwrap();
    let raw = std::fs::read_to_string(out.path().join("webscout_session.json")).unwrap();
    (out, serde_json::from_str(&raw).unwrap())
}

#[tokio::test]
async fn test_successful_screenshot() {
    let bin = tempfile::tempdir().unwrap();
    let browser = fake_browser(bin.path(), r#"printf 'PNG' > "$out""#);

    let (out, session) = run_with_browser(browser, 5_000).await;

    assert_eq!(session["stats"]["screenshots_succeeded"], 1);
    assert_eq!(session["stats"]["screenshots_failed"], 0);
    let page = &session["pages"][0];
    assert_eq!(page["screenshot_ok"], true);
    let shot = page["screenshot_path"].as_str().unwrap();
    assert!(shot.starts_with("screenshots/") && shot.ends_with(".png"));
    assert_eq!(std::fs::read(out.path().join(shot)).unwrap(), b"PNG");

    // Per-invocation profile and the run-scoped root are both gone
    let profile = std::fs::read_to_string(bin.path().join("profile.txt")).unwrap();
    let profile = PathBuf::from(profile.trim());
    assert!(!profile.exists());
    assert!(!profile.parent().unwrap().exists());
}

#[tokio::test]
async fn test_failing_browser_leaves_record_untouched() {
    let bin = tempfile::tempdir().unwrap();
    let browser = fake_browser(bin.path(), "exit 1");

    let (_out, session) = run_with_browser(browser, 5_000).await;

    assert_eq!(session["stats"]["screenshots_failed"], 1);
    assert_eq!(session["stats"]["screenshots_succeeded"], 0);
    assert_eq!(session["pages"][0]["screenshot_ok"], false);
    assert!(session["pages"][0]["screenshot_path"].is_null());
}

#[tokio::test]
async fn test_hanging_browser_is_killed_at_deadline() {
    let bin = tempfile::tempdir().unwrap();
    let browser = fake_browser(bin.path(), "exec sleep 30");

    let started = std::time::Instant::now();
    let (_out, session) = run_with_browser(browser, 300).await;

    assert!(started.elapsed() < std::time::Duration::from_secs(20));
    assert_eq!(session["stats"]["screenshots_failed"], 1);
    assert_eq!(session["pages"][0]["screenshot_ok"], false);
}

#[tokio::test]
async fn test_missing_browser_override_is_fatal() {
    let out = tempfile::tempdir().unwrap();
    let input = write_targets(&["127.0.0.1".to_string()]);
    let config = Config {
        screenshots: true,
        chrome_path: Some(PathBuf::from("/definitely/not/chromium")),
        ..test_config(input.path(), out.path())
    };
    let err = run_pipeline(config).await.unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/chromium"));
    assert!(!out.path().join("webscout_session.json").exists());
}
