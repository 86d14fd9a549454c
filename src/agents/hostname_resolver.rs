//! Forward DNS resolution of responsive hosts.

use std::sync::Arc;

use log::{debug, error};

use super::{Agent, PipelineContext};
use crate::events::{Event, Topic};
use crate::session::Page;

/// Records the addresses each responsive host resolves to.
pub struct HostnameResolver {
    ctx: Arc<PipelineContext>,
}

impl HostnameResolver {
    pub fn new(ctx: Arc<PipelineContext>) -> Self {
        HostnameResolver { ctx }
    }

    async fn on_url_responsive(&self, url: String) {
        let Some(page) = self.ctx.page_for(self.id(), &url) else {
            return;
        };
        if let Some(addr) = page.ip_host() {
            debug!("[{}] Skipping hostname resolving on IP host: {}", self.id(), url);
            page.set_addresses(vec![addr]);
            return;
        }
        self.resolve(&page).await;
    }

    async fn resolve(&self, page: &Page) {
        let Some(hostname) = page.url().host_str() else {
            return;
        };
        match self.ctx.resolver.lookup_ip(format!("{hostname}.")).await {
            Ok(lookup) => {
                let addresses: Vec<_> = lookup.iter().collect();
                debug!("[{}] {} resolved to {:?}", self.id(), hostname, addresses);
                page.set_addresses(addresses);
            }
            Err(e) => {
                debug!("[{}] Error: {}", self.id(), e);
                error!("Failed to resolve hostname for {}", page.url());
            }
        }
    }
}

impl Agent for HostnameResolver {
    fn id(&self) -> &'static str {
        "agent:hostname_resolver"
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
