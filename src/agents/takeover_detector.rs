//! Subdomain takeover checks against the provider table.

use std::net::IpAddr;
use std::sync::Arc;

use hickory_resolver::proto::rr::{RData, Record};
use log::{debug, info, trace, warn};

use super::{Agent, PipelineContext};
use crate::events::{Event, Topic};
use crate::session::{Page, Session, Severity};
use crate::takeover::{evaluate, normalize_fqdn, PROVIDERS, TAKEOVER_TAG};

const AGENT_ID: &str = "agent:takeover_detector";

pub struct TakeoverDetector {
    ctx: Arc<PipelineContext>,
}

impl TakeoverDetector {
    pub fn new(ctx: Arc<PipelineContext>) -> Self {
        TakeoverDetector { ctx }
    }

    async fn on_url_responsive(&self, url: String) {
        let Some(page) = self.ctx.page_for(self.id(), &url) else {
            return;
        };
        if page.ip_host().is_some() {
            debug!("[{}] Skipping takeover detection on IP URL {}", self.id(), url);
            return;
        }
        self.detect(&page).await;
    }

    async fn detect(&self, page: &Page) {
        let Some(hostname) = page.url().host_str() else {
            return;
        };
        let Some((addresses, cname)) = self.lookup(hostname).await else {
            return;
        };
        debug!("[{}] IP addresses for {}: {:?}", AGENT_ID, hostname, addresses);
        debug!("[{}] CNAME for {}: {}", AGENT_ID, hostname, cname);

        assess_page(&self.ctx.session, page, &cname, &addresses).await;
    }

    /// Resolved addresses and canonical name for `hostname`.
    async fn lookup(&self, hostname: &str) -> Option<(Vec<IpAddr>, String)> {
        let fqdn = normalize_fqdn(hostname);
        let lookup = match self.ctx.resolver.lookup_ip(fqdn.as_str()).await {
            Ok(lookup) => lookup,
            Err(e) => {
                debug!("[{}] Unable to resolve {}: {}", AGENT_ID, hostname, e);
                return None;
            }
        };
        let addresses = lookup.iter().collect();
        let cname = canonical_name(lookup.as_lookup().records(), fqdn);
        Some((addresses, cname))
    }
}

/// The last CNAME target in `records`, or `fqdn` when the answer has none.
pub(crate) fn canonical_name(records: &[Record], fqdn: String) -> String {
    records
        .iter()
        .filter_map(|record| match record.data() {
            Some(RData::CNAME(target)) => Some(target.0.to_string()),
            _ => None,
        })
        .last()
        .map(|name| normalize_fqdn(&name))
        .unwrap_or(fqdn)
}

/// Reads the stored body of `page` and tags it with the first identified
/// provider, plus the takeover tag when the body shows an unclaimed resource.
///
/// Pages without a readable body artifact are left untouched.
async fn assess_page(session: &Session, page: &Page, cname: &str, addresses: &[IpAddr]) {
    let Some(relative) = page.body_path() else {
        trace!("[{}] No HTML body stored for {}", AGENT_ID, page.url());
        return;
    };
    let body = match tokio::fs::read(session.artifact_path(&relative)).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            debug!(
                "[{}] Error reading HTML body file for {}: {}",
                AGENT_ID,
                page.url(),
                e
            );
            return;
        }
    };

    let Some(assessment) = evaluate(PROVIDERS, cname, addresses, &body) else {
        return;
    };
    let provider = assessment.provider;
    if page.add_tag(provider.name, Severity::Info, provider.website) {
        info!("{}: {}", page.url(), provider.name);
    }
    if assessment.vulnerable {
        page.add_tag(TAKEOVER_TAG, Severity::Danger, provider.remediation);
        warn!(
            "{}: vulnerable to takeover on {}",
            page.url(),
            provider.name
        );
    }
}

impl Agent for TakeoverDetector {
    fn id(&self) -> &'static str {
        AGENT_ID
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

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_resolver::proto::rr::rdata::{A, CNAME};
    use hickory_resolver::proto::rr::Name;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use url::Url;

    fn name(s: &str) -> Name {
        Name::from_ascii(s).unwrap()
    }

    fn cname_record(owner: &str, target: &str) -> Record {
        Record::from_rdata(name(owner), 300, RData::CNAME(CNAME(name(target))))
    }

    fn a_record(owner: &str, ip: [u8; 4]) -> Record {
        Record::from_rdata(name(owner), 300, RData::A(A::from(std::net::Ipv4Addr::from(ip))))
    }

    fn page_with_body(dir: &TempDir, body: &str) -> Page {
        let page = Page::new(Url::parse("http://assets.example.com/").unwrap());
        std::fs::create_dir_all(dir.path().join("html")).unwrap();
        let relative = PathBuf::from("html").join("assets.html");
        std::fs::write(dir.path().join(&relative), body).unwrap();
        page.set_body_path(relative);
        page
    }

    #[test]
    fn test_canonical_name_takes_last_cname() {
        let records = vec![
            cname_record("assets.example.com.", "assets.cdn.example.net."),
            cname_record("assets.cdn.example.net.", "bucket.s3.amazonaws.com."),
            a_record("bucket.s3.amazonaws.com.", [52, 216, 0, 1]),
        ];
        assert_eq!(
            canonical_name(&records, "assets.example.com.".into()),
            "bucket.s3.amazonaws.com."
        );
    }

    #[test]
    fn test_canonical_name_falls_back_to_fqdn() {
        let records = vec![a_record("example.com.", [93, 184, 216, 34])];
        assert_eq!(
            canonical_name(&records, "example.com.".into()),
            "example.com."
        );
        assert_eq!(canonical_name(&[], "example.com.".into()), "example.com.");
    }

    #[tokio::test]
    async fn test_missing_body_leaves_page_untagged() {
        let dir = TempDir::new().unwrap();
        let session = Session::new(dir.path());
        let page = Page::new(Url::parse("http://assets.example.com/").unwrap());

        assess_page(&session, &page, "bucket.s3.amazonaws.com.", &[]).await;
        assert!(page.tags().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_body_leaves_page_untagged() {
        let dir = TempDir::new().unwrap();
        let session = Session::new(dir.path());
        let page = Page::new(Url::parse("http://assets.example.com/").unwrap());
        page.set_body_path(PathBuf::from("html").join("gone.html"));

        assess_page(&session, &page, "bucket.s3.amazonaws.com.", &[]).await;
        assert!(page.tags().is_empty());
    }

    #[tokio::test]
    async fn test_unclaimed_bucket_tags_provider_then_takeover() {
        let dir = TempDir::new().unwrap();
        let session = Session::new(dir.path());
        let page = page_with_body(&dir, "<Error><Code>NoSuchBucket</Code></Error>");

        assess_page(&session, &page, "bucket.s3.amazonaws.com.", &[]).await;

        let tags = page.tags();
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Amazon S3", TAKEOVER_TAG]);
        assert_eq!(tags[0].severity, Severity::Info);
        assert_eq!(tags[1].severity, Severity::Danger);
    }

    #[tokio::test]
    async fn test_claimed_bucket_gets_provider_only() {
        let dir = TempDir::new().unwrap();
        let session = Session::new(dir.path());
        let page = page_with_body(&dir, "<html><body>Welcome</body></html>");

        assess_page(&session, &page, "bucket.s3.amazonaws.com.", &[]).await;

        assert!(page.has_tag("Amazon S3"));
        assert!(!page.has_tag(TAKEOVER_TAG));
    }
}
