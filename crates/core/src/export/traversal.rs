//! Reference-graph walk from a root document.
//!
//! The walk is depth-first and uses an explicit stack, so arbitrarily deep
//! link chains cannot exhaust the call stack. A document is recorded as
//! visited before its links are read, which is what terminates cycles.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

use super::{CancelFlag, ExportError, ReadErrorPolicy};
use crate::exclusion::{ExclusionPolicy, ExclusionReason};
use crate::vault::{
    Corpus, CorpusError, Document, decode_text, extract_links, filter_excluded_sections,
};

/// Documents included in an export, in discovery order.
pub type VisitedSet = IndexSet<Document>;

/// Outcome of a traversal.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    /// Included documents, depth-first pre-order.
    pub visited: VisitedSet,
    /// Documents that were reached but excluded, with the rule that matched.
    pub excluded: IndexMap<Document, ExclusionReason>,
    /// Documents that could not be read under [`ReadErrorPolicy::Skip`].
    pub skipped: IndexSet<Document>,
    /// Raw bytes of every scanned text document, exactly as read for link
    /// extraction.
    pub contents: HashMap<Document, Vec<u8>>,
}

pub struct Traversal<'a, C: Corpus + ?Sized> {
    corpus: &'a C,
    policy: &'a ExclusionPolicy,
    excluded_headers: &'a [String],
    read_policy: ReadErrorPolicy,
    cancel: Option<&'a CancelFlag>,
}

impl<'a, C: Corpus + ?Sized> Traversal<'a, C> {
    pub fn new(
        corpus: &'a C,
        policy: &'a ExclusionPolicy,
        excluded_headers: &'a [String],
    ) -> Self {
        Self {
            corpus,
            policy,
            excluded_headers,
            read_policy: ReadErrorPolicy::default(),
            cancel: None,
        }
    }

    pub fn with_read_policy(mut self, read_policy: ReadErrorPolicy) -> Self {
        self.read_policy = read_policy;
        self
    }

    pub fn with_cancel_flag(mut self, cancel: &'a CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Walk everything reachable from `root`.
    pub fn collect(&self, root: &Document) -> Result<Collected, ExportError> {
        let mut out = Collected::default();
        let mut stack = vec![root.clone()];

        while let Some(doc) = stack.pop() {
            if self.cancel.is_some_and(CancelFlag::is_cancelled) {
                return Err(ExportError::Cancelled);
            }

            if out.visited.contains(&doc)
                || out.excluded.contains_key(&doc)
                || out.skipped.contains(&doc)
            {
                continue;
            }

            let reason = match self.policy.evaluate(&doc, self.corpus) {
                Ok(reason) => reason,
                Err(e) => {
                    self.recover(&doc, e, &mut out)?;
                    continue;
                }
            };
            if let Some(reason) = reason {
                debug!(path = doc.path(), %reason, "excluded");
                out.excluded.insert(doc, reason);
                continue;
            }

            debug!(path = doc.path(), "included");
            out.visited.insert(doc.clone());

            if doc.is_binary() {
                continue;
            }

            let bytes = match self.corpus.read_binary(&doc) {
                Ok(bytes) => bytes,
                Err(e) => {
                    self.recover(&doc, e, &mut out)?;
                    continue;
                }
            };

            let text = decode_text(bytes.clone());
            let scoped = filter_excluded_sections(&text, self.excluded_headers);
            let children = extract_links(&scoped, self.corpus);
            out.contents.insert(doc.clone(), bytes);

            // Reversed so the first link is popped, and walked, first.
            stack.extend(children.into_iter().rev().filter(|c| !out.visited.contains(c)));
        }

        Ok(out)
    }

    fn recover(
        &self,
        doc: &Document,
        err: CorpusError,
        out: &mut Collected,
    ) -> Result<(), ExportError> {
        match self.read_policy {
            ReadErrorPolicy::Abort => Err(ExportError::Read(err)),
            ReadErrorPolicy::Skip => {
                warn!(path = doc.path(), error = %err, "skipping unreadable document");
                out.skipped.insert(doc.clone());
                Ok(())
            }
        }
    }
}
