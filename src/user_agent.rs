//! Request identity randomization.
//!
//! Every request and browser invocation presents a randomly chosen desktop
//! User-Agent, and HTTP requests carry forwarding headers with random IPv4
//! addresses.

use std::net::Ipv4Addr;

use rand::seq::IndexedRandom;
use rand::Rng;

/// Fallback User-Agent if the pool is somehow empty
const FALLBACK_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.7; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_7_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0",
];

/// Picks a random desktop browser User-Agent.
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(FALLBACK_USER_AGENT)
}

/// Generates a random IPv4 address with a non-zero first octet.
pub fn random_ipv4() -> Ipv4Addr {
    let mut rng = rand::rng();
    Ipv4Addr::new(
        rng.random_range(1..=254),
        rng.random_range(0..=255),
        rng.random_range(0..=255),
        rng.random_range(1..=254),
    )
}

/// Forged forwarding headers, each with its own random address.
pub fn forwarding_headers() -> [(&'static str, String); 3] {
    [
        ("X-Forwarded-For", random_ipv4().to_string()),
        ("Via", format!("1.1 {}", random_ipv4())),
        (
            "Forwarded",
            format!("for={};proto=http;by={}", random_ipv4(), random_ipv4()),
        ),
    ]
}
