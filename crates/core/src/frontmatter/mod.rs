//! Frontmatter parsing and metadata inspection.
//!
//! This module provides functionality to:
//! - Split YAML frontmatter from the body of a markdown document
//! - Decide whether a metadata value counts as "set" for exclusion rules

pub mod parser;
pub mod types;

pub use parser::{FrontmatterParseError, parse};
pub use types::{Frontmatter, Metadata, ParsedDocument, is_truthy};
