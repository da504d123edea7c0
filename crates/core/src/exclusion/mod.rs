//! Exclusion rules: which documents are left out of an export.
//!
//! Documents are excluded by folder, by filename pattern, or by a truthy
//! frontmatter key. Header exclusions do not remove documents; they hide
//! sections from link scanning and live in [`crate::vault::sections`].

pub mod pattern;
pub mod policy;

pub use pattern::{FilePattern, matches_pattern};
pub use policy::{ExclusionConfig, ExclusionPolicy, ExclusionReason};
