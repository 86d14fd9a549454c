//! Deterministic artifact naming.

use sha1::{Digest, Sha1};
use url::{Host, Url};

/// Builds the artifact base name for a URL.
///
/// Format: `<scheme>__<host>__<hash>` where `<host>` is the host (with an
/// explicit port, if any) with `.` replaced by `_` and the first `:` by `__`,
/// and `<hash>` is the first 16 hex digits of SHA-1 over path plus fragment.
/// IPv6 hosts lose their brackets and every `:` in the address becomes `_`.
/// The result is lower-cased.
pub fn base_filename(url: &Url) -> String {
    let mut host = match url.host() {
        Some(Host::Ipv6(addr)) => addr.to_string().replace(':', "_"),
        _ => url.host_str().unwrap_or_default().to_string(),
    };
    if let Some(port) = url.port() {
        host.push(':');
        host.push_str(&port.to_string());
    }
    let host = host.replace('.', "_").replacen(':', "__", 1);

    let mut hasher = Sha1::new();
    hasher.update(url.path().as_bytes());
    hasher.update(url.fragment().unwrap_or_default().as_bytes());
    let digest = format!("{:x}", hasher.finalize());

    format!("{}__{}__{}", url.scheme(), host, &digest[..16]).to_lowercase()
}
