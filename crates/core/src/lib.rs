//! Core library for mdexport: collect a note and everything it links to,
//! apply exclusion rules, and package the result as a zip archive.

pub mod config;
pub mod exclusion;
pub mod export;
pub mod frontmatter;
pub mod vault;

#[cfg(test)]
pub(crate) mod test_utils;

pub use exclusion::{ExclusionConfig, ExclusionPolicy, ExclusionReason};
pub use export::{
    CancelFlag, Collected, ExportError, ExportReport, Exporter, ReadErrorPolicy, VisitedSet,
};
pub use vault::{Corpus, CorpusError, Document, FsVault};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
