//! HTML parsing for stored response bodies.

mod html;

pub use html::{extract_body_features, extract_title};
