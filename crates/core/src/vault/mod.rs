//! Vault access: documents, link extraction and section filtering.
//!
//! This module provides the corpus abstraction traversal reads from, a
//! filesystem-backed implementation, and the text utilities that decide which
//! links a document contributes.

pub mod classify;
pub mod corpus;
pub mod extractor;
pub mod sections;
pub mod walker;

pub use classify::is_binary_path;
pub use corpus::{Corpus, CorpusError, Document, FsVault, decode_text};
pub use extractor::{extract_link_targets, extract_links};
pub use sections::filter_excluded_sections;
pub use walker::{VaultWalker, VaultWalkerError, WalkedFile};
