//! Per-URL target record.
//!
//! Each stage owns a disjoint group of fields, and each group sits behind its own
//! lock so stages never contend with each other. Tags have their own lock because
//! several detectors append concurrently.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use url::{Host, Url};
use uuid::Uuid;

use super::filename::base_filename;

/// Severity class of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Danger,
}

/// A named annotation attached to a page by a detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub severity: Severity,
    pub link: String,
}

#[derive(Debug, Default)]
struct ResponseData {
    status: Option<String>,
    headers: Vec<(String, String)>,
    headers_path: Option<PathBuf>,
    body_path: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct ScreenshotData {
    path: Option<PathBuf>,
    succeeded: bool,
}

/// Everything observed about one URL.
#[derive(Debug)]
pub struct Page {
    id: Uuid,
    url: Url,
    base_filename: String,
    addresses: Mutex<Vec<IpAddr>>,
    response: Mutex<ResponseData>,
    screenshot: Mutex<ScreenshotData>,
    title: Mutex<Option<String>>,
    tags: Mutex<Vec<Tag>>,
}

/// Serializable view of a page, taken at the end of the run.
#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub id: Uuid,
    pub url: String,
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
    pub addresses: Vec<IpAddr>,
    pub status: Option<String>,
    pub headers: Vec<(String, String)>,
    pub headers_path: Option<PathBuf>,
    pub body_path: Option<PathBuf>,
    pub screenshot_path: Option<PathBuf>,
    pub screenshot_ok: bool,
    pub title: Option<String>,
    pub tags: Vec<Tag>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Page {
    pub fn new(url: Url) -> Self {
        let base_filename = base_filename(&url);
        Page {
            id: Uuid::new_v4(),
            url,
            base_filename,
            addresses: Mutex::default(),
            response: Mutex::default(),
            screenshot: Mutex::default(),
            title: Mutex::default(),
            tags: Mutex::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The host's address when the URL names an IP literal.
    pub fn ip_host(&self) -> Option<IpAddr> {
        match self.url.host()? {
            Host::Ipv4(addr) => Some(IpAddr::V4(addr)),
            Host::Ipv6(addr) => Some(IpAddr::V6(addr)),
            Host::Domain(_) => None,
        }
    }

    pub fn base_filename(&self) -> &str {
        &self.base_filename
    }

    // Addresses (hostname resolver)

    pub fn set_addresses(&self, addresses: Vec<IpAddr>) {
        *lock(&self.addresses) = addresses;
    }

    pub fn addresses(&self) -> Vec<IpAddr> {
        lock(&self.addresses).clone()
    }

    // Response (HTTP requester)

    pub fn set_response(&self, status: String, headers: Vec<(String, String)>) {
        let mut response = lock(&self.response);
        response.status = Some(status);
        response.headers = headers;
    }

    pub fn status(&self) -> Option<String> {
        lock(&self.response).status.clone()
    }

    pub fn headers(&self) -> Vec<(String, String)> {
        lock(&self.response).headers.clone()
    }

    pub fn set_headers_path(&self, path: PathBuf) {
        lock(&self.response).headers_path = Some(path);
    }

    pub fn headers_path(&self) -> Option<PathBuf> {
        lock(&self.response).headers_path.clone()
    }

    pub fn set_body_path(&self, path: PathBuf) {
        lock(&self.response).body_path = Some(path);
    }

    pub fn body_path(&self) -> Option<PathBuf> {
        lock(&self.response).body_path.clone()
    }

    // Screenshot (screenshot capturer)

    pub fn set_screenshot(&self, path: &Path) {
        let mut shot = lock(&self.screenshot);
        shot.path = Some(path.to_path_buf());
        shot.succeeded = true;
    }

    pub fn screenshot_path(&self) -> Option<PathBuf> {
        lock(&self.screenshot).path.clone()
    }

    pub fn screenshot_ok(&self) -> bool {
        lock(&self.screenshot).succeeded
    }

    // Title (title extractor)

    pub fn set_title(&self, title: String) {
        *lock(&self.title) = Some(title);
    }

    pub fn title(&self) -> Option<String> {
        lock(&self.title).clone()
    }

    // Tags (detectors)

    /// Appends a tag unless one with the same name is already present.
    ///
    /// Returns `true` when the tag was added.
    pub fn add_tag(&self, name: &str, severity: Severity, link: &str) -> bool {
        let mut tags = lock(&self.tags);
        if tags.iter().any(|t| t.name == name) {
            return false;
        }
        tags.push(Tag {
            name: name.to_string(),
            severity,
            link: link.to_string(),
        });
        true
    }

    pub fn has_tag(&self, name: &str) -> bool {
        lock(&self.tags).iter().any(|t| t.name == name)
    }

    pub fn tags(&self) -> Vec<Tag> {
        lock(&self.tags).clone()
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary {
            id: self.id,
            url: self.url.to_string(),
            scheme: self.url.scheme().to_string(),
            host: self.url.host_str().unwrap_or_default().to_string(),
            port: self.url.port(),
            path: self.url.path().to_string(),
            addresses: self.addresses(),
            status: self.status(),
            headers: self.headers(),
            headers_path: self.headers_path(),
            body_path: self.body_path(),
            screenshot_path: self.screenshot_path(),
            screenshot_ok: self.screenshot_ok(),
            title: self.title(),
            tags: self.tags(),
        }
    }
}
