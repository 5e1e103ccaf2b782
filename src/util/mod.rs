//! Utility functions for common operations.
//!
//! - **Text processing**: removing characters that XML 1.0 documents cannot contain

mod text;

pub use text::strip_invalid_xml_chars;
