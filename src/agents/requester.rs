//! HTTP fetching and artifact persistence.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use log::{debug, error, info};
use reqwest::header::USER_AGENT;

use super::{Agent, PipelineContext};
use crate::config::{ARTIFACT_SAVE_TIMEOUT, HEADERS_DIR, HTML_DIR};
use crate::events::{Event, Topic};
use crate::session::{Counter, Page};
use crate::user_agent::{forwarding_headers, random_user_agent};
use crate::utils::wait_for_file;

/// Requests every classified URL once and stores what comes back.
pub struct Requester {
    ctx: Arc<PipelineContext>,
}

impl Requester {
    pub fn new(ctx: Arc<PipelineContext>) -> Self {
        Requester { ctx }
    }

    async fn on_url(&self, url: String) {
        debug!("[{}] Received new URL {}", self.id(), url);
        let stats = self.ctx.session.stats();

        let mut request = self
            .ctx
            .client
            .get(&url)
            .header(USER_AGENT, random_user_agent());
        for (name, value) in forwarding_headers() {
            request = request.header(name, value);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                stats.increment(Counter::RequestFailed);
                debug!("[{}] Error: {:?}", self.id(), e);
                if e.is_timeout() {
                    error!("{url}: request timeout");
                } else {
                    debug!("{url}: failed");
                }
                return;
            }
        };

        let status = response.status();
        stats.record_response(status.as_u16());
        let status_line = format!(
            "{} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        )
        .trim_end()
        .to_string();
        let colored_status = if status.is_server_error() {
            status_line.red()
        } else if status.is_client_error() {
            status_line.yellow()
        } else {
            status_line.green()
        };
        info!("{url}: {colored_status}");

        let page = match self.ctx.session.add_page(&url) {
            Ok(page) => page,
            Err(e) => {
                debug!("[{}] Error: {}", self.id(), e);
                error!("Failed to create page for URL: {url}");
                return;
            }
        };
        page.set_response(status_line, collect_headers(response.headers()));

        self.write_headers(&page).await;
        if self.ctx.config.save_body {
            match response.bytes().await {
                Ok(body) => self.write_body(&page, &body).await,
                Err(e) => {
                    debug!("[{}] Error: {}", self.id(), e);
                    error!("Failed to read response body for {url}");
                }
            }
        }

        self.ctx.bus.publish(Event::UrlResponsive(url));
    }

    async fn write_headers(&self, page: &Page) {
        let relative = PathBuf::from(HEADERS_DIR).join(format!("{}.txt", page.base_filename()));
        let contents = render_headers(
            page.status().as_deref().unwrap_or_default(),
            &page.headers(),
        );
        self.persist(page, &relative, contents.as_bytes(), "headers")
            .await;
        page.set_headers_path(relative);
    }

    async fn write_body(&self, page: &Page, body: &[u8]) {
        let relative = PathBuf::from(HTML_DIR).join(format!("{}.html", page.base_filename()));
        self.persist(page, &relative, body, "body").await;
        page.set_body_path(relative);
    }

    /// Writes an artifact and waits for it to become visible. Failures are logged.
    async fn persist(&self, page: &Page, relative: &Path, contents: &[u8], what: &str) {
        let path = self.ctx.session.artifact_path(relative);
        if let Err(e) = tokio::fs::write(&path, contents).await {
            debug!("[{}] Error: {}", self.id(), e);
            error!(
                "Failed to write HTTP response {} for {} to {}",
                what,
                page.url(),
                path.display()
            );
        }
        if !wait_for_file(&path, ARTIFACT_SAVE_TIMEOUT).await {
            error!(
                "Failed to write HTTP response {} for {} to {}",
                what,
                page.url(),
                path.display()
            );
        }
    }
}

impl Agent for Requester {
    fn id(&self) -> &'static str {
        "agent:requester"
    }

    fn register(self: Arc<Self>, ctx: &PipelineContext) {
        ctx.bus.subscribe(Topic::UrlClassified, move |event| {
            let agent = Arc::clone(&self);
            async move {
                if let Event::UrlClassified(url) = event {
                    agent.on_url(url).await;
                }
            }
        });
    }
}

/// Flattens a header map into name/value pairs; repeated headers are joined with a space.
fn collect_headers(headers: &reqwest::header::HeaderMap) -> Vec<(String, String)> {
    headers
        .keys()
        .map(|name| {
            let value = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(" ");
            (name.as_str().to_string(), value)
        })
        .collect()
}

/// Status line followed by one `Name: Value` line per header.
fn render_headers(status: &str, headers: &[(String, String)]) -> String {
    let mut out = format!("{status}\n");
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\n"));
    }
    out
}
