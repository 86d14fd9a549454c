//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, output layout, browser locations)
//! - Port sets and port specification parsing
//! - CLI option types and the library `Config`

mod constants;
mod ports;
mod types;

// Re-export all constants
pub use constants::*;
pub use ports::{parse_ports, LARGE_PORTS, MEDIUM_PORTS, SMALL_PORTS, XLARGE_PORTS};
pub use types::{default_threads, Config, LogFormat, LogLevel, Opt};
