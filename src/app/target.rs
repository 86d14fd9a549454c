//! Input line classification.

use log::warn;
use url::{Host, Url};

/// Maximum accepted input line length.
const MAX_TARGET_LENGTH: usize = 2048;

/// One pipeline entry point read from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// An `http(s)://` URL; skips port scanning and classification
    Url(String),
    /// A host name or IP literal to port-scan
    Host(String),
}

/// Classifies one trimmed, non-empty input line.
///
/// Lines that are neither an http(s) URL nor a valid host are logged and
/// yield `None`.
pub fn parse_target(line: &str) -> Option<Target> {
    if line.len() > MAX_TARGET_LENGTH {
        warn!(
            "Skipping input line exceeding maximum length ({} > {}): {}...",
            line.len(),
            MAX_TARGET_LENGTH,
            line.chars().take(50).collect::<String>()
        );
        return None;
    }

    let lower = line.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return match Url::parse(line) {
            Ok(url) if url.host().is_some() => Some(Target::Url(url.to_string())),
            _ => {
                warn!("Skipping invalid URL: {line}");
                None
            }
        };
    }

    let bare = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(line);
    if let Ok(addr) = bare.parse::<std::net::IpAddr>() {
        return Some(Target::Host(addr.to_string()));
    }

    match Host::parse(line) {
        Ok(Host::Domain(domain)) if !domain.is_empty() => Some(Target::Host(domain)),
        Ok(Host::Ipv4(addr)) => Some(Target::Host(addr.to_string())),
        _ => {
            warn!("Skipping invalid host: {line}");
            None
        }
    }
}
