//! Page title extraction from stored bodies.

use std::sync::Arc;

use log::debug;

use super::{Agent, PipelineContext};
use crate::events::{Event, Topic};
use crate::parse::extract_title;

pub struct TitleExtractor {
    ctx: Arc<PipelineContext>,
}

impl TitleExtractor {
    pub fn new(ctx: Arc<PipelineContext>) -> Self {
        TitleExtractor { ctx }
    }

    async fn on_url_responsive(&self, url: String) {
        let Some(page) = self.ctx.page_for(self.id(), &url) else {
            return;
        };
        let Some(relative) = page.body_path() else {
            debug!("[{}] No HTML body stored for {}", self.id(), url);
            return;
        };
        let path = self.ctx.session.artifact_path(&relative);
        let body = match tokio::fs::read(&path).await {
            Ok(body) => body,
            Err(e) => {
                debug!(
                    "[{}] Error reading HTML body file for {}: {}",
                    self.id(),
                    url,
                    e
                );
                return;
            }
        };
        if let Some(title) = extract_title(&String::from_utf8_lossy(&body)) {
            page.set_title(title);
        }
    }
}

impl Agent for TitleExtractor {
    fn id(&self) -> &'static str {
        "agent:title_extractor"
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
