//! Subdomain takeover detection.
//!
//! A host whose DNS still points at a third-party provider, while the provider
//! reports the resource as unclaimed, can be registered by anyone. Detection is
//! pure: it takes already-resolved DNS evidence and the stored page body.

mod providers;

use std::net::IpAddr;

pub use providers::{CnameMatch, ProviderRule, UnclaimedBody, PROVIDERS};

/// Tag name attached when a provider reports the resource unclaimed.
pub const TAKEOVER_TAG: &str = "Domain Takeover";

/// Outcome for the first provider the DNS evidence identifies.
#[derive(Debug, Clone, Copy)]
pub struct TakeoverAssessment {
    pub provider: &'static ProviderRule,
    /// The body carries the provider's unclaimed-resource fingerprint
    pub vulnerable: bool,
}

/// Normalizes a DNS name to lower-case trailing-dot form.
pub fn normalize_fqdn(name: &str) -> String {
    let mut name = name.to_ascii_lowercase();
    if !name.ends_with('.') {
        name.push('.');
    }
    name
}

/// Walks `providers` in order and assesses the first one identified by
/// `cname` or `addresses`. Later providers are never considered.
pub fn evaluate(
    providers: &'static [ProviderRule],
    cname: &str,
    addresses: &[IpAddr],
    body: &str,
) -> Option<TakeoverAssessment> {
    let cname = normalize_fqdn(cname);
    providers
        .iter()
        .find(|p| p.identifies(&cname, addresses))
        .map(|provider| TakeoverAssessment {
            provider,
            vulnerable: provider.unclaimed.matches(body),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const NONE: &[IpAddr] = &[];

    #[test]
    fn test_twenty_providers() {
        assert_eq!(PROVIDERS.len(), 20);
        assert_eq!(PROVIDERS[0].name, "GitHub Pages");
        assert_eq!(PROVIDERS[19].name, "Pantheon");
    }

    #[test]
    fn test_s3_unclaimed_bucket() {
        let a = evaluate(
            PROVIDERS,
            "assets.example.com.s3.amazonaws.com.",
            NONE,
            "<Error><Code>NoSuchBucket</Code></Error>",
        )
        .unwrap();
        assert_eq!(a.provider.name, "Amazon S3");
        assert!(a.vulnerable);
    }

    #[test]
    fn test_s3_claimed_bucket() {
        let a = evaluate(PROVIDERS, "bucket.s3.amazonaws.com", NONE, "<html>ok</html>").unwrap();
        assert_eq!(a.provider.name, "Amazon S3");
        assert!(!a.vulnerable);
    }

    #[test]
    fn test_github_pages_by_address() {
        let addrs = [IpAddr::V4(Ipv4Addr::new(185, 199, 110, 153))];
        let a = evaluate(
            PROVIDERS,
            "www.example.com.",
            &addrs,
            "There isn't a GitHub Pages site here.",
        )
        .unwrap();
        assert_eq!(a.provider.name, "GitHub Pages");
        assert!(a.vulnerable);
    }

    #[test]
    fn test_exact_cname_does_not_match_subdomain() {
        assert!(evaluate(PROVIDERS, "x.cname.createsend.com.", NONE, "").is_none());
        let a = evaluate(PROVIDERS, "CNAME.createsend.com.", NONE, "").unwrap();
        assert_eq!(a.provider.name, "Campaign Monitor");
    }

    #[test]
    fn test_smugmug_empty_body() {
        let a = evaluate(PROVIDERS, "domains.smugmug.com.", NONE, "").unwrap();
        assert!(a.vulnerable);
        let a = evaluate(PROVIDERS, "domains.smugmug.com.", NONE, "<html>").unwrap();
        assert!(!a.vulnerable);
    }

    #[test]
    fn test_first_identified_provider_wins() {
        // Tumblr address with a Pantheon CNAME: Tumblr comes first in the table
        let addrs = [IpAddr::V4(Ipv4Addr::new(66, 6, 44, 4))];
        let a = evaluate(PROVIDERS, "site.pantheonsite.io.", &addrs, "The gods are wise").unwrap();
        assert_eq!(a.provider.name, "Tumblr");
        assert!(!a.vulnerable);
    }

    #[test]
    fn test_unrelated_host() {
        assert!(evaluate(PROVIDERS, "www.example.com.", NONE, "No such app").is_none());
    }

    #[test]
    fn test_normalize_fqdn() {
        assert_eq!(normalize_fqdn("Foo.Example.COM"), "foo.example.com.");
        assert_eq!(normalize_fqdn("foo.example.com."), "foo.example.com.");
    }
}
