//! Body-based technology detection (HTML, script sources, meta tags).

use crate::fingerprint::models::{BodyFeatures, Fingerprint};
use crate::fingerprint::patterns::meta_matches;

/// True if any HTML, script-src or meta rule of `fingerprint` matches.
pub(crate) fn body_matches(fingerprint: &Fingerprint, body: &BodyFeatures) -> bool {
    if fingerprint.html.iter().any(|re| re.is_match(&body.html)) {
        return true;
    }

    if fingerprint
        .script
        .iter()
        .any(|re| body.script_sources.iter().any(|src| re.is_match(src)))
    {
        return true;
    }

    fingerprint
        .meta
        .iter()
        .any(|(key, re)| meta_matches(key, re, &body.meta_tags))
}
