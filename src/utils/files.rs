//! Artifact durability checks.

use std::path::Path;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::config::FILE_POLL_INTERVAL;

/// Polls for `path` to exist, checking every [`FILE_POLL_INTERVAL`].
///
/// Returns `true` as soon as the file is visible and `false` once `timeout`
/// has elapsed without it appearing.
pub async fn wait_for_file(path: &Path, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(FILE_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_existing_file_returns_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "x").unwrap();
        assert!(wait_for_file(&path, Duration::from_millis(10)).await);
    }

    #[tokio::test]
    async fn test_missing_file_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let started = std::time::Instant::now();
        assert!(!wait_for_file(&dir.path().join("nope"), Duration::from_millis(250)).await);
        assert!(started.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_file_appearing_later() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.png");
        let writer_path = path.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(150)).await;
            tokio::fs::write(writer_path, b"png").await.unwrap();
        });
        assert!(wait_for_file(&path, Duration::from_secs(5)).await);
    }
}
