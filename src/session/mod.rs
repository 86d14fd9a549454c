//! Target record store.
//!
//! `Session` owns the map of discovered URLs to their `Page` records and the
//! run statistics. Records are created idempotently: every stage that learns
//! about a URL calls `add_page` and gets the same shared record back.

mod filename;
mod page;
mod stats;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use url::Url;

use crate::config::{HEADERS_DIR, HTML_DIR, SCREENSHOTS_DIR};

pub use filename::base_filename;
pub use page::{Page, PageSummary, Severity, Tag};
pub use stats::{Counter, RunStats, StatsSnapshot};

/// Shared state of one pipeline run.
pub struct Session {
    pages: Mutex<HashMap<String, Arc<Page>>>,
    stats: RunStats,
    out_dir: PathBuf,
}

impl Session {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Session {
            pages: Mutex::new(HashMap::new()),
            stats: RunStats::new(),
            out_dir: out_dir.into(),
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn headers_dir(&self) -> PathBuf {
        self.out_dir.join(HEADERS_DIR)
    }

    pub fn html_dir(&self) -> PathBuf {
        self.out_dir.join(HTML_DIR)
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.out_dir.join(SCREENSHOTS_DIR)
    }

    /// Resolves an artifact path recorded relative to the output directory.
    pub fn artifact_path(&self, relative: &Path) -> PathBuf {
        self.out_dir.join(relative)
    }

    /// Returns the record for `url`, creating it on first sight.
    ///
    /// URLs are keyed by their parsed, serialized form, so `http://A.com` and
    /// `http://a.com/` share one record.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `url` is not an absolute URL.
    pub fn add_page(&self, url: &str) -> Result<Arc<Page>, url::ParseError> {
        let parsed = Url::parse(url)?;
        let mut pages = self.pages.lock().unwrap_or_else(PoisonError::into_inner);
        let page = pages
            .entry(parsed.as_str().to_string())
            .or_insert_with(|| Arc::new(Page::new(parsed)));
        Ok(Arc::clone(page))
    }

    pub fn get_page(&self, url: &str) -> Option<Arc<Page>> {
        let key = Url::parse(url).ok()?;
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key.as_str())
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records, ordered by URL.
    pub fn pages(&self) -> Vec<Arc<Page>> {
        let mut pages: Vec<Arc<Page>> = self
            .pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        pages.sort_by(|a, b| a.url().as_str().cmp(b.url().as_str()));
        pages
    }

    /// URLs that answered with an HTTP response, ordered.
    pub fn responsive_urls(&self) -> Vec<String> {
        self.pages()
            .iter()
            .filter(|p| p.status().is_some())
            .map(|p| p.url().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_page_is_idempotent() {
        let session = Session::new("/tmp");
        let a = session.add_page("http://example.com/").unwrap();
        let b = session.add_page("http://EXAMPLE.com").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.id(), b.id());
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_add_page_rejects_relative() {
        let session = Session::new("/tmp");
        assert!(session.add_page("example.com").is_err());
        assert!(session.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_add_page_yields_one_record() {
        let session = Arc::new(Session::new("/tmp"));
        let mut handles = Vec::new();
        for _ in 0..32 {
            let session = Arc::clone(&session);
            handles.push(tokio::spawn(async move {
                session.add_page("https://example.com:8443/").unwrap().id()
            }));
        }
        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await.unwrap());
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_responsive_urls_sorted_and_filtered() {
        let session = Session::new("/tmp");
        session
            .add_page("https://b.com/")
            .unwrap()
            .set_response("200 OK".into(), vec![]);
        session
            .add_page("http://a.com/")
            .unwrap()
            .set_response("301 Moved Permanently".into(), vec![]);
        session.add_page("http://c.com/").unwrap();
        assert_eq!(
            session.responsive_urls(),
            vec!["http://a.com/".to_string(), "https://b.com/".to_string()]
        );
    }

    #[test]
    fn test_artifact_dirs() {
        let session = Session::new("/out");
        assert_eq!(session.headers_dir(), PathBuf::from("/out/headers"));
        assert_eq!(session.html_dir(), PathBuf::from("/out/html"));
        assert_eq!(session.screenshots_dir(), PathBuf::from("/out/screenshots"));
    }
}
