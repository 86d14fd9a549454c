//! TCP connect scanning.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use log::{debug, info};
use tokio::net::TcpStream;

use super::{Agent, PipelineContext};
use crate::events::{Event, Topic};
use crate::session::Counter;

/// Connects to every configured port of each discovered host.
pub struct PortScanner {
    ctx: Arc<PipelineContext>,
}

impl PortScanner {
    pub fn new(ctx: Arc<PipelineContext>) -> Self {
        PortScanner { ctx }
    }

    fn on_host(&self, host: String) {
        debug!("[{}] Received new host: {}", self.id(), host);
        // Each port is its own unit of work
        for &port in &self.ctx.ports {
            let ctx = Arc::clone(&self.ctx);
            let host = host.clone();
            self.ctx.bus.limiter().spawn(async move {
                if is_port_open(&host, port, ctx.config.scan_timeout()).await {
                    ctx.session.stats().increment(Counter::PortOpen);
                    info!(
                        "{}: port {} {}",
                        host,
                        port.to_string().green(),
                        "open".green()
                    );
                    ctx.bus.publish(Event::PortOpen { port, host });
                } else {
                    ctx.session.stats().increment(Counter::PortClosed);
                    debug!("Port {port} is closed on {host}");
                }
            });
        }
    }
}

impl Agent for PortScanner {
    fn id(&self) -> &'static str {
        "agent:port_scanner"
    }

    fn register(self: Arc<Self>, ctx: &PipelineContext) {
        ctx.bus.subscribe(Topic::HostDiscovered, move |event| {
            let agent = Arc::clone(&self);
            async move {
                if let Event::HostDiscovered(host) = event {
                    agent.on_host(host);
                }
            }
        });
    }
}

/// True if a TCP connection to `host:port` succeeds within `timeout`.
pub(crate) async fn is_port_open(host: &str, port: u16, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, TcpStream::connect((host, port))).await,
        Ok(Ok(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_open_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(is_port_open("127.0.0.1", port, Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn test_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        assert!(!is_port_open("127.0.0.1", port, Duration::from_secs(1)).await);
    }
}
