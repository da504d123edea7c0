//! Wikilink extraction and resolution.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::corpus::{Corpus, Document};

static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Matches [[target]] or [[target|alias]]; the target stops at the first | or ]
    Regex::new(r"\[\[([^\]|]+)(?:\|[^\]]*)?\]\]").unwrap()
});

/// Link targets in order of appearance, duplicates included.
///
/// Embeds (`![[file]]`) are returned like any other link. Unterminated or
/// empty brackets are ignored.
pub fn extract_link_targets(text: &str) -> Vec<&str> {
    WIKILINK_RE
        .captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

/// Resolve every link in `text` to a document of `corpus`.
///
/// Targets the corpus cannot resolve are dropped.
pub fn extract_links<C: Corpus + ?Sized>(text: &str, corpus: &C) -> Vec<Document> {
    extract_link_targets(text)
        .into_iter()
        .filter_map(|target| {
            let resolved = corpus.resolve_link_target(target);
            if resolved.is_none() {
                trace!(link = target, "unresolved link");
            }
            resolved
        })
        .collect()
}
