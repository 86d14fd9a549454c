//! Port selection.
//!
//! Named port sets plus parsing of explicit comma-separated port lists.

use crate::error_handling::ConfigError;

/// Ports scanned with `--ports small`
pub const SMALL_PORTS: &[u16] = &[80, 443];

/// Ports scanned with `--ports medium` (the default)
pub const MEDIUM_PORTS: &[u16] = &[80, 443, 8000, 8080, 8443];

/// Ports scanned with `--ports large`
pub const LARGE_PORTS: &[u16] = &[
    80, 81, 443, 591, 2082, 2087, 2095, 2096, 3000, 8000, 8008, 8080, 8083, 8443, 8834, 8888,
];

/// Ports scanned with `--ports xlarge`
pub const XLARGE_PORTS: &[u16] = &[
    80, 81, 300, 443, 591, 593, 832, 981, 1010, 1311, 2082, 2087, 2095, 2096, 2480, 3000, 3128,
    3333, 4243, 4567, 4711, 4712, 4993, 5000, 5104, 5108, 5800, 6543, 7000, 7396, 7474, 8000,
    8001, 8008, 8014, 8042, 8069, 8080, 8081, 8083, 8088, 8090, 8091, 8118, 8123, 8172, 8222,
    8243, 8280, 8281, 8333, 8443, 8500, 8530, 8531, 8834, 8887, 8888, 8983, 9000, 9043, 9060,
    9080, 9090, 9091, 9200, 9443, 9800, 9981, 12443, 16080, 18091, 18092, 20720, 28017,
];

/// Resolves a port specification into the list of ports to scan.
///
/// Accepts the named sets `small`, `medium` (also `default` or an empty string),
/// `large` and `xlarge` (also `huge`), or a comma-separated list of ports.
/// Explicit lists keep their order; duplicates are dropped.
///
/// # Errors
///
/// Returns `ConfigError::InvalidPort` for entries that are not numbers in
/// `1..=65535`.
pub fn parse_ports(spec: &str) -> Result<Vec<u16>, ConfigError> {
    let ports = match spec.trim().to_lowercase().as_str() {
        "small" => SMALL_PORTS.to_vec(),
        "" | "medium" | "default" => MEDIUM_PORTS.to_vec(),
        "large" => LARGE_PORTS.to_vec(),
        "xlarge" | "huge" => XLARGE_PORTS.to_vec(),
        custom => {
            let mut ports: Vec<u16> = Vec::new();
            for entry in custom.split(',') {
                let entry = entry.trim();
                let port: u32 = entry
                    .parse()
                    .map_err(|_| ConfigError::InvalidPort(entry.to_string()))?;
                if !(1..=65535).contains(&port) {
                    return Err(ConfigError::InvalidPort(entry.to_string()));
                }
                let port = port as u16;
                if !ports.contains(&port) {
                    ports.push(port);
                }
            }
            ports
        }
    };
    Ok(ports)
}
