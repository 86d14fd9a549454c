//! HTTP/HTTPS classification of open ports.

use std::sync::Arc;

use log::debug;

use super::{Agent, PipelineContext};
use crate::events::{Event, Topic};

/// Turns each open port into exactly one URL.
pub struct SchemeClassifier {
    ctx: Arc<PipelineContext>,
}

impl SchemeClassifier {
    pub fn new(ctx: Arc<PipelineContext>) -> Self {
        SchemeClassifier { ctx }
    }

    async fn on_port_open(&self, port: u16, host: String) {
        debug!("[{}] Received new open port on {}: {}", self.id(), host, port);
        let scheme = if self.is_tls(&host, port).await {
            "https"
        } else {
            "http"
        };
        self.ctx
            .bus
            .publish(Event::UrlClassified(host_port_url(&host, port, scheme)));
    }

    async fn is_tls(&self, host: &str, port: u16) -> bool {
        match port {
            80 => false,
            443 => true,
            _ => self.ctx.prober.speaks_tls(host, port).await,
        }
    }
}

impl Agent for SchemeClassifier {
    fn id(&self) -> &'static str {
        "agent:scheme_classifier"
    }

    fn register(self: Arc<Self>, ctx: &PipelineContext) {
        ctx.bus.subscribe(Topic::PortOpen, move |event| {
            let agent = Arc::clone(&self);
            async move {
                if let Event::PortOpen { port, host } = event {
                    agent.on_port_open(port, host).await;
                }
            }
        });
    }
}

/// Builds `scheme://host/`, adding the port when it is not the scheme's default.
///
/// IPv6 literals are bracketed.
pub fn host_port_url(host: &str, port: u16, scheme: &str) -> String {
    let host = if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]")
    } else {
        host.to_string()
    };
    match (scheme, port) {
        ("http", 80) | ("https", 443) => format!("{scheme}://{host}/"),
        _ => format!("{scheme}://{host}:{port}/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports_are_omitted() {
        assert_eq!(host_port_url("example.com", 80, "http"), "http://example.com/");
        assert_eq!(host_port_url("example.com", 443, "https"), "https://example.com/");
    }

    #[test]
    fn test_non_default_ports_are_kept() {
        assert_eq!(
            host_port_url("example.com", 8443, "https"),
            "https://example.com:8443/"
        );
        assert_eq!(
            host_port_url("example.com", 443, "http"),
            "http://example.com:443/"
        );
    }

    #[test]
    fn test_ipv6_is_bracketed() {
        assert_eq!(host_port_url("::1", 8080, "http"), "http://[::1]:8080/");
        assert_eq!(host_port_url("[::1]", 80, "http"), "http://[::1]/");
    }
}
