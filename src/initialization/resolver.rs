//! DNS resolver initialization.

use std::sync::Arc;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use log::debug;

/// Initializes the DNS resolver shared by the resolver and takeover stages.
///
/// Uses the system configuration (`/etc/resolv.conf` on unix). When that cannot
/// be read, falls back to the library's default upstream servers. Lookups are
/// single-shot; a failed lookup is not retried by the pipeline.
pub fn init_resolver() -> Arc<TokioAsyncResolver> {
    let resolver = match TokioAsyncResolver::tokio_from_system_conf() {
        Ok(resolver) => resolver,
        Err(e) => {
            debug!("System resolver configuration unavailable ({e}), using defaults");
            let mut opts = ResolverOpts::default();
            // Names are always queried as FQDNs; never append search domains
            opts.ndots = 0;
            TokioAsyncResolver::tokio(ResolverConfig::default(), opts)
        }
    };
    Arc::new(resolver)
}
