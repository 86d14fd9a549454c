//! Header-based technology detection.

use crate::fingerprint::models::Fingerprint;

/// True if any header rule of `fingerprint` matches a response header.
///
/// Header names compare case-insensitively; rule names are already lower-cased.
pub(crate) fn headers_match(fingerprint: &Fingerprint, headers: &[(String, String)]) -> bool {
    if fingerprint.headers.is_empty() {
        return false;
    }
    headers.iter().any(|(name, value)| {
        let name = name.to_lowercase();
        fingerprint
            .headers
            .iter()
            .any(|(rule_name, pattern)| *rule_name == name && pattern.is_match(value))
    })
}
