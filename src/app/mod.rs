//! Main application modules.
//!
//! This module provides input target parsing and statistics printing used by
//! the run flow.

pub mod statistics;
pub mod target;

// Re-export public API
pub use statistics::print_final_statistics;
pub use target::{parse_target, Target};
