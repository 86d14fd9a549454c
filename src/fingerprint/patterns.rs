//! Pattern compilation and meta tag lookup.
//!
//! Wappalyzer patterns are regular expressions that may carry a trailing
//! `\;version:\1` or `\;confidence:50` directive. Directives are cut off before
//! compiling and every pattern matches case-insensitively.

use std::collections::HashMap;

use log::debug;
use regex::{Regex, RegexBuilder};

/// Compiles one ruleset pattern.
///
/// Returns `None` when the pattern is not a valid regex; the caller skips that
/// pattern and keeps the rest of the rule.
pub(crate) fn compile_pattern(pattern: &str) -> Option<Regex> {
    let pattern = strip_directives(pattern);
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            debug!("Skipping fingerprint pattern {pattern:?}: {e}");
            None
        }
    }
}

fn strip_directives(pattern: &str) -> &str {
    match pattern.find(r"\;") {
        Some(idx) => &pattern[..idx],
        None => pattern,
    }
}

/// Checks a meta pattern against extracted meta tags.
///
/// Meta tags are keyed `name:<n>`, `property:<p>` or `http-equiv:<h>`.
/// A rule key with an explicit `property:` or `http-equiv:` prefix only looks at
/// that attribute; a plain key (like `generator`) tries all three.
pub(crate) fn meta_matches(
    meta_key: &str,
    pattern: &Regex,
    meta_tags: &HashMap<String, Vec<String>>,
) -> bool {
    let matches_any = |key: &str| {
        meta_tags
            .get(key)
            .is_some_and(|values| values.iter().any(|v| pattern.is_match(v)))
    };

    if meta_key.starts_with("property:") || meta_key.starts_with("http-equiv:") {
        return matches_any(meta_key);
    }

    ["name", "property", "http-equiv"]
        .iter()
        .any(|prefix| matches_any(&format!("{prefix}:{meta_key}")))
}
