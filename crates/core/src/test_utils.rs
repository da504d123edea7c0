//! In-memory corpus for unit tests.

use std::collections::{BTreeMap, HashSet};
use std::io;

use crate::frontmatter::{self, Metadata};
use crate::vault::{Corpus, CorpusError, Document};

#[derive(Debug, Default)]
pub struct MemoryCorpus {
    files: BTreeMap<String, Vec<u8>>,
    unreadable: HashSet<String>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.as_bytes().to_vec());
        self
    }

    pub fn with_binary(mut self, path: &str, content: &[u8]) -> Self {
        self.files.insert(path.to_string(), content.to_vec());
        self
    }

    /// Register a document whose reads always fail.
    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.files.insert(path.to_string(), Vec::new());
        self.unreadable.insert(path.to_string());
        self
    }

    pub fn doc(&self, path: &str) -> Document {
        self.lookup(path).unwrap_or_else(|| panic!("no document {path}"))
    }
}

impl Corpus for MemoryCorpus {
    fn lookup(&self, path: &str) -> Option<Document> {
        self.files.contains_key(path).then(|| Document::new(path))
    }

    fn resolve_link_target(&self, name: &str) -> Option<Document> {
        self.lookup(name).or_else(|| self.lookup(&format!("{name}.md"))).or_else(|| {
            self.files
                .keys()
                .map(Document::new)
                .find(|d| d.stem() == name || d.file_name() == name)
        })
    }

    fn metadata(&self, doc: &Document) -> Result<Option<Metadata>, CorpusError> {
        if doc.is_binary() {
            return Ok(None);
        }
        let text = self.read_text(doc)?;
        Ok(frontmatter::parse(&text).ok().and_then(|p| p.frontmatter).map(|f| f.fields))
    }

    fn read_binary(&self, doc: &Document) -> Result<Vec<u8>, CorpusError> {
        if self.unreadable.contains(doc.path()) {
            return Err(CorpusError::Read {
                path: doc.path().to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        self.files
            .get(doc.path())
            .cloned()
            .ok_or_else(|| CorpusError::NotFound(doc.path().to_string()))
    }
}
