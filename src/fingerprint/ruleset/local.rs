//! Local file loading for fingerprint rulesets.
//!
//! A ruleset path names a single JSON file holding an array of rules.

use std::path::Path;

use tokio::fs;

use crate::error_handling::FingerprintError;
use crate::fingerprint::models::TechnologyRule;

/// Loads rules from a local JSON file.
///
/// A path that cannot be read (including a directory) or does not parse as a
/// rule array is an error.
pub(crate) async fn load_from_path(path: &Path) -> Result<Vec<TechnologyRule>, FingerprintError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| FingerprintError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(serde_json::from_str(&content)?)
}
