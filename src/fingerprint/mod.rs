//! Technology fingerprinting using Wappalyzer-style rulesets.
//!
//! A ruleset is an ordered list of rules. Each rule names a technology and
//! carries regex patterns for response headers, the HTML body, script sources
//! and meta tag contents. A rule matches when any one pattern matches; matched
//! rules also pull in the technologies they imply.

mod detection;
mod models;
mod patterns;
mod ruleset;

pub use detection::detect_technologies;
pub use models::{BodyFeatures, DetectedTechnology, Fingerprint, ImpliedTechnology, TechnologyRule};
pub use ruleset::{load_ruleset, FingerprintRuleset};
