//! CSS selector parsing utilities.

use scraper::Selector;

/// Parses a CSS selector, logging instead of panicking on failure.
///
/// Callers treat `None` as "nothing matches" and carry on.
pub fn parse_selector_with_fallback(selector_str: &str, context: &str) -> Option<Selector> {
    match Selector::parse(selector_str) {
        Ok(selector) => Some(selector),
        Err(e) => {
            log::error!(
                "Failed to parse CSS selector '{}' in {}: {}",
                selector_str,
                context,
                e
            );
            None
        }
    }
}
