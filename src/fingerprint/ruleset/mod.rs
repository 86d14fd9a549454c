//! Fingerprint ruleset loading and compilation.
//!
//! The ruleset is loaded once per run, either from a configured path or from the
//! ruleset bundled into the binary, and never changes afterwards.

mod local;

use std::collections::HashMap;
use std::path::Path;

use log::{debug, info};

use crate::error_handling::FingerprintError;
use crate::fingerprint::models::{Fingerprint, TechnologyRule};
use crate::fingerprint::patterns::compile_pattern;

use local::load_from_path;

/// Ruleset compiled into the binary, used when no path is configured.
const BUNDLED_RULESET: &str = include_str!("../../../data/fingerprints.json");

/// Compiled, ordered fingerprint ruleset.
#[derive(Debug, Clone)]
pub struct FingerprintRuleset {
    fingerprints: Vec<Fingerprint>,
    index: HashMap<String, usize>,
    /// Where the rules came from (`bundled` or a path)
    pub source: String,
}

impl FingerprintRuleset {
    /// Compiles rules, preserving their order. Invalid patterns are dropped from
    /// their rule; the rule itself is kept.
    pub fn from_rules(rules: Vec<TechnologyRule>, source: impl Into<String>) -> Self {
        let mut fingerprints = Vec::with_capacity(rules.len());
        let mut index = HashMap::new();
        for rule in rules {
            let fingerprint = compile_rule(rule);
            // First definition of a name wins for implied lookups
            index
                .entry(fingerprint.name.clone())
                .or_insert(fingerprints.len());
            fingerprints.push(fingerprint);
        }
        FingerprintRuleset {
            fingerprints,
            index,
            source: source.into(),
        }
    }

    /// Parses and compiles a JSON array of rules.
    ///
    /// # Errors
    ///
    /// Returns `FingerprintError::ParseFailed` if `json` is not an array of rules.
    pub fn from_json(json: &str, source: impl Into<String>) -> Result<Self, FingerprintError> {
        let rules: Vec<TechnologyRule> = serde_json::from_str(json)?;
        Ok(Self::from_rules(rules, source))
    }

    /// The ruleset shipped with the binary.
    pub fn bundled() -> Result<Self, FingerprintError> {
        Self::from_json(BUNDLED_RULESET, "bundled")
    }

    pub fn fingerprints(&self) -> &[Fingerprint] {
        &self.fingerprints
    }

    pub fn get(&self, name: &str) -> Option<&Fingerprint> {
        self.index.get(name).map(|&i| &self.fingerprints[i])
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }
}

fn compile_rule(rule: TechnologyRule) -> Fingerprint {
    let headers = rule
        .headers
        .iter()
        .filter_map(|(name, pattern)| Some((name.to_lowercase(), compile_pattern(pattern)?)))
        .collect();
    let html = rule.html.iter().filter_map(|p| compile_pattern(p)).collect();
    let script = rule
        .script
        .iter()
        .filter_map(|p| compile_pattern(p))
        .collect();
    let meta = rule
        .meta
        .iter()
        .flat_map(|(key, patterns)| {
            let key = key.to_lowercase();
            patterns
                .iter()
                .filter_map(move |p| Some((key.clone(), compile_pattern(p)?)))
        })
        .collect();

    Fingerprint {
        implies: rule.implies.iter().map(|i| i.name().to_string()).collect(),
        name: rule.name,
        categories: rule.categories,
        website: rule.website,
        headers,
        html,
        script,
        meta,
    }
}

/// Loads the ruleset from `path`, or the bundled ruleset when `path` is `None`.
///
/// # Errors
///
/// Returns a `FingerprintError` if the file cannot be read or parsed. A run
/// cannot fingerprint without rules, so callers treat this as fatal.
pub async fn load_ruleset(path: Option<&Path>) -> Result<FingerprintRuleset, FingerprintError> {
    let ruleset = match path {
        Some(path) => {
            debug!("Loading fingerprint ruleset from {}", path.display());
            let rules = load_from_path(path).await?;
            FingerprintRuleset::from_rules(rules, path.display().to_string())
        }
        None => FingerprintRuleset::bundled()?,
    };
    info!(
        "Loaded {} technology fingerprints ({})",
        ruleset.len(),
        ruleset.source
    );
    Ok(ruleset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_ruleset_parses() {
        let ruleset = FingerprintRuleset::bundled().expect("bundled ruleset must parse");
        assert!(!ruleset.is_empty());
        assert!(ruleset.get("WordPress").is_some());
        assert!(ruleset.get("PHP").is_some());
    }

    #[test]
    fn test_bundled_implied_names_exist() {
        let ruleset = FingerprintRuleset::bundled().unwrap();
        for fp in ruleset.fingerprints() {
            for implied in &fp.implies {
                assert!(
                    ruleset.get(implied).is_some(),
                    "{} implies unknown {}",
                    fp.name,
                    implied
                );
            }
        }
    }

    #[test]
    fn test_invalid_pattern_keeps_rule() {
        let json = r#"[{"name": "Broken", "html": ["(unclosed", "ok-marker"], "headers": {"X-Bad": "["}}]"#;
        let ruleset = FingerprintRuleset::from_json(json, "test").unwrap();
        let fp = ruleset.get("Broken").unwrap();
        assert_eq!(fp.html.len(), 1);
        assert!(fp.headers.is_empty());
    }

    #[test]
    fn test_header_names_lowercased() {
        let json = r#"[{"name": "Express", "headers": {"X-Powered-By": "^Express$"}}]"#;
        let ruleset = FingerprintRuleset::from_json(json, "test").unwrap();
        assert_eq!(ruleset.get("Express").unwrap().headers[0].0, "x-powered-by");
    }

    #[test]
    fn test_order_preserved() {
        let json = r#"[{"name": "B"}, {"name": "A"}, {"name": "C"}]"#;
        let ruleset = FingerprintRuleset::from_json(json, "test").unwrap();
        let names: Vec<&str> = ruleset
            .fingerprints()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn test_load_ruleset_missing_path_is_error() {
        let result = load_ruleset(Some(Path::new("/definitely/not/here.json"))).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_ruleset_default_is_bundled() {
        let ruleset = load_ruleset(None).await.unwrap();
        assert_eq!(ruleset.source, "bundled");
    }
}
