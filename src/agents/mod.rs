//! Pipeline stages.
//!
//! Each agent subscribes to one topic on the run's `EventBus` and either
//! publishes the next event or records its findings on the target's `Page`.
//!
//! ```text
//! HostDiscovered -> port scanner -> PortOpen -> scheme classifier -> UrlClassified
//!   -> requester -> UrlResponsive -> {resolver, title, screenshot, fingerprint, takeover}
//! ```

mod browser;
mod fingerprinter;
mod hostname_resolver;
mod port_scanner;
mod requester;
mod scheme_classifier;
mod screenshotter;
mod takeover_detector;
mod title_extractor;

use std::sync::Arc;

use hickory_resolver::TokioAsyncResolver;
use log::{debug, error};

use crate::config::Config;
use crate::error_handling::ScreenshotError;
use crate::events::EventBus;
use crate::fingerprint::FingerprintRuleset;
use crate::session::{Page, Session};
use crate::tls::TlsProber;

pub use browser::{locate_browser, BrowserProcess, ProcessOutcome};
pub use fingerprinter::Fingerprinter;
pub use hostname_resolver::HostnameResolver;
pub use port_scanner::PortScanner;
pub use requester::Requester;
pub use scheme_classifier::{host_port_url, SchemeClassifier};
pub use screenshotter::{browser_args, Screenshotter};
pub use takeover_detector::TakeoverDetector;
pub use title_extractor::TitleExtractor;

/// Shared resources every agent works with.
pub struct PipelineContext {
    pub session: Arc<Session>,
    pub config: Arc<Config>,
    pub ports: Vec<u16>,
    pub client: Arc<reqwest::Client>,
    pub resolver: Arc<TokioAsyncResolver>,
    pub prober: TlsProber,
    pub ruleset: Arc<FingerprintRuleset>,
    pub bus: Arc<EventBus>,
}

impl PipelineContext {
    /// Looks up the record for a URL announced on the bus.
    ///
    /// The requester creates the record before it publishes, so a miss is logged
    /// as an error.
    pub(crate) fn page_for(&self, agent: &str, url: &str) -> Option<Arc<Page>> {
        debug!("[{agent}] Received new responsive URL {url}");
        let page = self.session.get_page(url);
        if page.is_none() {
            error!("Unable to find page for URL: {url}");
        }
        page
    }
}

/// A pipeline stage that hooks itself onto the event bus.
pub trait Agent: Send + Sync + 'static {
    fn id(&self) -> &'static str;

    /// Subscribes the agent's handlers on `ctx.bus`.
    fn register(self: Arc<Self>, ctx: &PipelineContext);
}

/// Creates and registers every stage of the pipeline.
///
/// The screenshot stage is only registered when screenshots are enabled.
///
/// # Errors
///
/// Returns a `ScreenshotError` if screenshots are enabled and no usable browser
/// or temporary profile root is available.
pub async fn register_all(ctx: &Arc<PipelineContext>) -> Result<(), ScreenshotError> {
    let mut agents: Vec<Arc<dyn Agent>> = vec![
        Arc::new(PortScanner::new(Arc::clone(ctx))),
        Arc::new(SchemeClassifier::new(Arc::clone(ctx))),
        Arc::new(Requester::new(Arc::clone(ctx))),
        Arc::new(HostnameResolver::new(Arc::clone(ctx))),
        Arc::new(TitleExtractor::new(Arc::clone(ctx))),
        Arc::new(Fingerprinter::new(Arc::clone(ctx))),
        Arc::new(TakeoverDetector::new(Arc::clone(ctx))),
    ];
    if ctx.config.screenshots {
        agents.push(Arc::new(Screenshotter::new(Arc::clone(ctx)).await?));
    } else {
        debug!("Screenshots disabled, not registering the screenshot stage");
    }

    for agent in agents {
        debug!("Registering agent {}", agent.id());
        agent.register(ctx);
    }
    Ok(())
}
