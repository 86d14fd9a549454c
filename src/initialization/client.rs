//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

/// Initializes the HTTP client shared by the requester stage.
///
/// The client:
/// - never follows redirects, so 3xx responses are recorded as-is
/// - accepts invalid and self-signed certificates
/// - routes all traffic through `proxy` when one is given
///
/// The User-Agent is set per request, not here.
///
/// # Errors
///
/// Returns a `reqwest::Error` if the proxy URL is invalid or client creation fails.
pub fn init_client(
    timeout: Duration,
    proxy: Option<&str>,
) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let mut builder = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .danger_accept_invalid_certs(true)
        .timeout(timeout)
        .connect_timeout(timeout);

    if let Some(proxy) = proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }

    Ok(Arc::new(builder.build()?))
}
