//! Data structures for fingerprint rulesets.
//!
//! - `TechnologyRule`: one rule exactly as it appears in the ruleset JSON
//! - `Fingerprint`: the same rule with every pattern compiled
//! - `BodyFeatures`: what detection needs from an HTML body
//! - `DetectedTechnology`: a detection result

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Technology fingerprint rule as stored in the ruleset JSON.
///
/// Only `name` is required. `html`, `script` and meta values accept either a
/// single pattern string or an array of patterns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnologyRule {
    pub name: String,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Implied technologies, as `{"name": ...}` objects or plain strings
    #[serde(default)]
    pub implies: Vec<ImpliedTechnology>,
    #[serde(default)]
    pub website: String,
    /// Header patterns: header_name -> pattern
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_string_or_array")]
    pub html: Vec<String>,
    /// Script source patterns; Wappalyzer exports call this `scriptSrc`
    #[serde(default)]
    #[serde(alias = "scriptSrc")]
    #[serde(deserialize_with = "deserialize_string_or_array")]
    pub script: Vec<String>,
    /// Meta tag patterns: meta_name -> pattern(s)
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_meta_map")]
    pub meta: HashMap<String, Vec<String>>,
}

/// Reference to an implied technology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImpliedTechnology {
    Named { name: String },
    Bare(String),
}

impl ImpliedTechnology {
    pub fn name(&self) -> &str {
        match self {
            ImpliedTechnology::Named { name } | ImpliedTechnology::Bare(name) => name,
        }
    }
}

/// A rule with its patterns compiled, ready for matching.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    pub name: String,
    pub categories: Vec<String>,
    pub website: String,
    pub implies: Vec<String>,
    /// Lower-cased header name with its value pattern
    pub headers: Vec<(String, Regex)>,
    pub html: Vec<Regex>,
    pub script: Vec<Regex>,
    /// Lower-cased meta key with its content pattern
    pub meta: Vec<(String, Regex)>,
}

/// Body-derived inputs for matching, extracted once per page.
#[derive(Debug, Clone, Default)]
pub struct BodyFeatures {
    /// Raw HTML text
    pub html: String,
    /// `src` attribute of every `<script>` element
    pub script_sources: Vec<String>,
    /// Meta tag contents keyed `name:<n>`, `property:<p>` or `http-equiv:<h>` (lower-cased)
    pub meta_tags: HashMap<String, Vec<String>>,
}

/// Technology detection result.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DetectedTechnology {
    pub name: String,
    pub website: String,
}

/// Deserializes a field that can be either a string or an array of strings
fn deserialize_string_or_array<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// Deserializes a meta map where values can be either strings or arrays of strings
fn deserialize_meta_map<'de, D>(deserializer: D) -> Result<HashMap<String, Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, MapAccess, Visitor};
    use std::fmt;

    struct MetaMapVisitor;

    impl<'de> Visitor<'de> for MetaMapVisitor {
        type Value = HashMap<String, Vec<String>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of string to string or array of strings")
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut result = HashMap::new();
            while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
                let patterns = match value {
                    serde_json::Value::String(s) => vec![s],
                    serde_json::Value::Array(arr) => arr
                        .into_iter()
                        .filter_map(|v| v.as_str().map(|s| s.to_string()))
                        .collect(),
                    _ => {
                        return Err(de::Error::invalid_type(
                            de::Unexpected::Other("expected string or array"),
                            &self,
                        ));
                    }
                };
                result.insert(key, patterns);
            }
            Ok(result)
        }
    }

    deserializer.deserialize_map(MetaMapVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_with_only_name() {
        let rule: TechnologyRule = serde_json::from_str(r#"{"name": "Bare"}"#).unwrap();
        assert_eq!(rule.name, "Bare");
        assert!(rule.categories.is_empty());
        assert!(rule.implies.is_empty());
        assert!(rule.headers.is_empty());
        assert!(rule.html.is_empty());
        assert!(rule.meta.is_empty());
    }

    #[test]
    fn test_rule_string_fields() {
        let json = r#"{
            "name": "WordPress",
            "categories": ["CMS", "Blogs"],
            "website": "https://wordpress.org",
            "html": "<link rel=[\"']stylesheet[\"'] [^>]+wp-(?:content|includes)",
            "scriptSrc": "/wp-includes/",
            "meta": {"generator": "^WordPress ?([\\d.]+)?\\;version:\\1"},
            "implies": ["PHP"]
        }"#;
        let rule: TechnologyRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.categories, vec!["CMS", "Blogs"]);
        assert_eq!(rule.html.len(), 1);
        assert_eq!(rule.script, vec!["/wp-includes/"]);
        assert_eq!(rule.meta["generator"].len(), 1);
        assert_eq!(rule.implies, vec![ImpliedTechnology::Bare("PHP".into())]);
    }

    #[test]
    fn test_implies_accepts_objects_and_strings() {
        let json = r#"{
            "name": "Laravel",
            "implies": [{"name": "PHP"}, "MySQL"]
        }"#;
        let rule: TechnologyRule = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = rule.implies.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["PHP", "MySQL"]);
    }

    #[test]
    fn test_meta_array_values() {
        let json = r#"{"name": "X", "meta": {"generator": ["a", "b"]}}"#;
        let rule: TechnologyRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.meta["generator"], vec!["a", "b"]);
    }

    #[test]
    fn test_meta_rejects_non_string_value() {
        let json = r#"{"name": "X", "meta": {"generator": 5}}"#;
        assert!(serde_json::from_str::<TechnologyRule>(json).is_err());
    }
}
