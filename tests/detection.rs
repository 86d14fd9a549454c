//! Detection engine tests through the public API, without network access.

use std::collections::HashMap;
use std::net::IpAddr;

use webscout::fingerprint::{detect_technologies, BodyFeatures, FingerprintRuleset};
use webscout::takeover::{evaluate, PROVIDERS};

fn names(ruleset: &FingerprintRuleset, headers: &[(&str, &str)], body: Option<&BodyFeatures>) -> Vec<String> {
    let headers: Vec<(String, String)> = headers
        .iter()
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .collect();
    detect_technologies(ruleset, &headers, body)
        .into_iter()
        .map(|t| t.name)
        .collect()
}

#[test]
fn test_header_and_body_match_of_one_rule_tags_once() {
    let ruleset = FingerprintRuleset::bundled().unwrap();
    let body = BodyFeatures {
        html: r#"<link rel="stylesheet" href="/wp-content/themes/x/style.css">"#.into(),
        script_sources: vec![],
        meta_tags: HashMap::new(),
    };
    let found = names(
        &ruleset,
        &[("X-Pingback", "https://blog.example.com/xmlrpc.php")],
        Some(&body),
    );
    assert_eq!(found.iter().filter(|n| *n == "WordPress").count(), 1);
    assert!(found.contains(&"PHP".to_string()));
    assert!(found.contains(&"MySQL".to_string()));
}

#[test]
fn test_implied_rule_is_tagged_without_its_own_match() {
    let ruleset = FingerprintRuleset::from_json(
        r#"[
            {"name": "A", "headers": {"Server": "^a-server"}, "implies": ["B", "Missing"]},
            {"name": "B", "website": "https://b.example", "html": "never-present"}
        ]"#,
        "test",
    )
    .unwrap();
    let found = detect_technologies(
        &ruleset,
        &[("server".into(), "A-Server/2".into())],
        None,
    );
    let found: Vec<(&str, &str)> = found
        .iter()
        .map(|t| (t.name.as_str(), t.website.as_str()))
        .collect();
    assert_eq!(found, vec![("A", ""), ("B", "https://b.example")]);
}

#[test]
fn test_header_only_matching_without_body() {
    let ruleset = FingerprintRuleset::bundled().unwrap();
    let found = names(&ruleset, &[("Server", "Caddy")], None);
    assert_eq!(found, vec!["Caddy", "Go"]);
}

#[test]
fn test_s3_takeover_evidence() {
    let vulnerable = evaluate(
        PROVIDERS,
        "static.example.com.s3-website-us-east-1.amazonaws.com.",
        &[],
        "<Code>NoSuchBucket</Code>",
    )
    .unwrap();
    assert_eq!(vulnerable.provider.name, "Amazon S3");
    assert!(vulnerable.vulnerable);

    let claimed = evaluate(
        PROVIDERS,
        "static.example.com.s3-website-us-east-1.amazonaws.com.",
        &[],
        "<html>Welcome</html>",
    )
    .unwrap();
    assert_eq!(claimed.provider.name, "Amazon S3");
    assert!(!claimed.vulnerable);
}

#[test]
fn test_github_pages_by_address() {
    let addrs: Vec<IpAddr> = vec!["185.199.110.153".parse().unwrap()];
    let a = evaluate(
        PROVIDERS,
        "docs.example.com.",
        &addrs,
        "There isn't a GitHub Pages site here.",
    )
    .unwrap();
    assert_eq!(a.provider.name, "GitHub Pages");
    assert!(a.vulnerable);
}

#[test]
fn test_unrelated_host_has_no_provider() {
    let addrs: Vec<IpAddr> = vec!["93.184.216.34".parse().unwrap()];
    assert!(evaluate(PROVIDERS, "www.example.com.", &addrs, "NoSuchBucket").is_none());
}
