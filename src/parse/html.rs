//! HTML extraction utilities.
//!
//! `scraper::Html` is not `Send`, so documents are parsed, queried and dropped
//! inside these synchronous functions and only owned data is returned.

use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::fingerprint::BodyFeatures;
use crate::utils::parse_selector_with_fallback;

static TITLE_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| parse_selector_with_fallback("title", "title extraction"));

static SCRIPT_SRC_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| parse_selector_with_fallback("script[src]", "script source extraction"));

static META_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| parse_selector_with_fallback("meta", "meta tag extraction"));

/// Extracts the text of the first `<title>` element, trimmed.
///
/// Returns `None` when the document has no title element.
pub fn extract_title(html: &str) -> Option<String> {
    let selector = TITLE_SELECTOR.as_ref()?;
    let document = Html::parse_document(html);
    let title = document
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string());
    log::trace!("Extracted title: {:?}", title);
    title
}

/// Extracts everything fingerprint matching needs from an HTML body.
///
/// Meta tags are keyed `name:<n>`, `property:<p>` and `http-equiv:<h>`, all
/// lower-cased. Several tags with the same key keep every content value.
pub fn extract_body_features(html: &str) -> BodyFeatures {
    let document = Html::parse_document(html);

    let script_sources = SCRIPT_SRC_SELECTOR
        .as_ref()
        .map(|selector| {
            document
                .select(selector)
                .filter_map(|element| element.value().attr("src"))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut meta_tags: HashMap<String, Vec<String>> = HashMap::new();
    for element in META_SELECTOR
        .as_ref()
        .into_iter()
        .flat_map(|selector| document.select(selector))
    {
        let attrs = element.value();
        let Some(content) = attrs.attr("content") else {
            continue;
        };
        for prefix in ["name", "property", "http-equiv"] {
            if let Some(key) = attrs.attr(prefix) {
                meta_tags
                    .entry(format!("{}:{}", prefix, key.to_lowercase()))
                    .or_default()
                    .push(content.to_string());
            }
        }
    }

    BodyFeatures {
        html: html.to_string(),
        script_sources,
        meta_tags,
    }
}
