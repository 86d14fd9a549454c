//! Technology detection and matching logic.
//!
//! Matching is pure: it reads headers and pre-extracted body features and never
//! touches the network or the filesystem.

mod body;
mod headers;

use std::collections::HashSet;

use crate::fingerprint::models::{BodyFeatures, DetectedTechnology, Fingerprint};
use crate::fingerprint::ruleset::FingerprintRuleset;

use body::body_matches;
use headers::headers_match;

/// Detects technologies from response headers and, when available, the body.
///
/// Every directly matched rule is reported once, followed by the rules it
/// implies (looked up by name, patterns not evaluated). Implied names missing
/// from the ruleset are skipped. A `None` body means header-only matching.
pub fn detect_technologies(
    ruleset: &FingerprintRuleset,
    headers: &[(String, String)],
    body: Option<&BodyFeatures>,
) -> Vec<DetectedTechnology> {
    let matched = ruleset.fingerprints().iter().filter(|fp| {
        headers_match(fp, headers) || body.is_some_and(|body| body_matches(fp, body))
    });

    let mut seen: HashSet<&str> = HashSet::new();
    let mut detected = Vec::new();

    for fp in matched {
        if seen.insert(fp.name.as_str()) {
            log::debug!("Identified technology {}", fp.name);
            detected.push(to_detected(fp));
        }
        for implied in &fp.implies {
            let Some(implied_fp) = ruleset.get(implied) else {
                continue;
            };
            if seen.insert(implied_fp.name.as_str()) {
                detected.push(to_detected(implied_fp));
            }
        }
    }

    detected
}

fn to_detected(fp: &Fingerprint) -> DetectedTechnology {
    DetectedTechnology {
        name: fp.name.clone(),
        website: fp.website.clone(),
    }
}
