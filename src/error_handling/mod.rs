//! Error handling.
//!
//! Errors are split by scope:
//! - **Run-fatal**: configuration, initialization, ruleset and browser setup
//!   failures. These are typed here and abort the run before any work starts.
//! - **Unit-scoped**: dial, HTTP, DNS, screenshot and parse failures. These are
//!   logged and counted by the stage that hit them and only end that unit.

mod types;

// Re-export public API
pub use types::{ConfigError, FingerprintError, InitializationError, ScreenshotError};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::OutputDirMissing(PathBuf::from("/nope"));
        assert_eq!(err.to_string(), "Output directory does not exist: /nope");

        let err = ConfigError::InvalidPort("http".into());
        assert_eq!(err.to_string(), "Invalid port: \"http\"");
    }

    #[test]
    fn test_fingerprint_error_from_json() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = FingerprintError::from(json_err);
        assert!(err.to_string().starts_with("Invalid fingerprint ruleset"));
    }

    #[test]
    fn test_screenshot_error_source_chain() {
        use std::error::Error;
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ScreenshotError::TempDirFailed(io);
        assert!(err.source().is_some());
    }
}
