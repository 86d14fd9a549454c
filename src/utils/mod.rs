//! Utility functions.
//!
//! This module provides:
//! - CSS selector parsing without panics
//! - Artifact existence polling

mod files;
mod selector;

pub use files::wait_for_file;
pub use selector::parse_selector_with_fallback;
