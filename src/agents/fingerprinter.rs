//! Technology fingerprinting of responsive pages.

use std::sync::Arc;

use log::{debug, info};

use super::{Agent, PipelineContext};
use crate::events::{Event, Topic};
use crate::fingerprint::{detect_technologies, BodyFeatures};
use crate::parse::extract_body_features;
use crate::session::{Page, Severity};

/// Tags pages with the technologies their headers and body reveal.
pub struct Fingerprinter {
    ctx: Arc<PipelineContext>,
}

impl Fingerprinter {
    pub fn new(ctx: Arc<PipelineContext>) -> Self {
        Fingerprinter { ctx }
    }

    async fn on_url_responsive(&self, url: String) {
        let Some(page) = self.ctx.page_for(self.id(), &url) else {
            return;
        };
        let body = self.load_body(&page).await;
        let detected = detect_technologies(&self.ctx.ruleset, &page.headers(), body.as_ref());
        for tech in detected {
            if page.add_tag(&tech.name, Severity::Info, &tech.website) {
                info!("{}: {}", url, tech.name);
            }
        }
    }

    /// Body features for matching, or `None` when no body artifact is readable.
    async fn load_body(&self, page: &Page) -> Option<BodyFeatures> {
        let path = self.ctx.session.artifact_path(&page.body_path()?);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Some(extract_body_features(&String::from_utf8_lossy(&bytes))),
            Err(e) => {
                debug!(
                    "[{}] No readable body for {} ({}), matching headers only",
                    self.id(),
                    page.url(),
                    e
                );
                None
            }
        }
    }
}

impl Agent for Fingerprinter {
    fn id(&self) -> &'static str {
        "agent:fingerprinter"
    }

    fn register(self: Arc<Self>, ctx: &PipelineContext) {
        ctx.bus.subscribe(Topic::UrlResponsive, move |event| {
            let agent = Arc::clone(&self);
            async move {
                if let Event::UrlResponsive(url) = event {
                    agent.on_url_responsive(url).await;
                }
            }
        });
    }
}
