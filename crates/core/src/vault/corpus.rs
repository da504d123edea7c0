//! Documents and the corpus they live in.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::classify::is_binary_path;
use super::walker::{VaultWalker, VaultWalkerError};
use crate::frontmatter::{self, Metadata};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error(transparent)]
    Walk(#[from] VaultWalkerError),

    #[error("document not found in vault: {0}")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A document identity: its vault-relative path and binary classification.
///
/// Content stays with the corpus; a `Document` is only a handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Document {
    path: String,
    binary: bool,
}

impl Document {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let binary = is_binary_path(&path);
        Self { path, binary }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_binary(&self) -> bool {
        self.binary
    }

    /// Bare filename, the part after the last `/`.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Filename without its final extension.
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(i) => &name[..i],
        }
    }
}

/// The host collection of documents that traversal reads from.
pub trait Corpus {
    /// Find a document by its exact vault-relative path.
    fn lookup(&self, path: &str) -> Option<Document>;

    /// Resolve the target of an inline link to a document.
    fn resolve_link_target(&self, name: &str) -> Option<Document>;

    /// Frontmatter of a document, if it has any.
    fn metadata(&self, doc: &Document) -> Result<Option<Metadata>, CorpusError>;

    /// Content as text, for scanning. Invalid UTF-8 is replaced, so this is
    /// never the source of archived bytes.
    fn read_text(&self, doc: &Document) -> Result<String, CorpusError> {
        self.read_binary(doc).map(decode_text)
    }

    fn read_binary(&self, doc: &Document) -> Result<Vec<u8>, CorpusError>;
}

/// Decode raw content for link scanning, replacing invalid UTF-8 sequences.
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// A corpus backed by a vault directory on disk.
///
/// The file list is captured when the vault is opened; content is read on
/// demand.
#[derive(Debug)]
pub struct FsVault {
    root: PathBuf,
    /// Relative path to absolute path.
    files: BTreeMap<String, PathBuf>,
    /// Lowercased relative path paired with the original, for case-insensitive lookups.
    folded: Vec<(String, String)>,
}

impl FsVault {
    /// Index every file under `root`.
    pub fn open(root: &Path) -> Result<Self, CorpusError> {
        let walker = VaultWalker::new(root)?;
        let files: BTreeMap<String, PathBuf> = walker
            .walk()?
            .into_iter()
            .map(|f| (f.relative_path, f.absolute_path))
            .collect();

        let folded = files.keys().map(|k| (k.to_lowercase(), k.clone())).collect();

        debug!(root = %walker.root().display(), files = files.len(), "indexed vault");
        Ok(Self { root: walker.root().to_path_buf(), files, folded })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// All documents, sorted by path.
    pub fn documents(&self) -> impl Iterator<Item = Document> + '_ {
        self.files.keys().map(Document::new)
    }

    fn absolute(&self, doc: &Document) -> Result<&Path, CorpusError> {
        self.files
            .get(doc.path())
            .map(PathBuf::as_path)
            .ok_or_else(|| CorpusError::NotFound(doc.path().to_string()))
    }

    fn exact(&self, path: &str) -> Option<Document> {
        if self.files.contains_key(path) {
            return Some(Document::new(path));
        }
        let with_ext = format!("{path}.md");
        self.files.contains_key(&with_ext).then(|| Document::new(with_ext))
    }

    fn case_insensitive(&self, lower: &str) -> Option<Document> {
        let with_ext = format!("{lower}.md");
        self.folded
            .iter()
            .find(|(folded, _)| *folded == lower)
            .or_else(|| self.folded.iter().find(|(folded, _)| *folded == with_ext))
            .map(|(_, original)| Document::new(original.as_str()))
    }

    /// Match `lower` against trailing path segments, preferring the shortest path.
    fn by_suffix(&self, lower: &str) -> Option<Document> {
        let slash = format!("/{lower}");
        let slash_md = format!("/{lower}.md");

        self.folded
            .iter()
            .filter(|(folded, _)| folded.ends_with(&slash) || folded.ends_with(&slash_md))
            .min_by(|(_, a), (_, b)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            .map(|(_, original)| Document::new(original.as_str()))
    }
}

impl Corpus for FsVault {
    fn lookup(&self, path: &str) -> Option<Document> {
        let path = path.strip_prefix("./").unwrap_or(path);
        self.files.contains_key(path).then(|| Document::new(path))
    }

    /// Resolution order: exact path, case-insensitive path, then the shortest
    /// path whose trailing segments match. A `#heading` or `#^block` suffix is
    /// ignored and `.md` may be omitted.
    fn resolve_link_target(&self, name: &str) -> Option<Document> {
        let name = name.split('#').next().unwrap_or("").trim();
        let name = name.strip_prefix("./").unwrap_or(name).trim_start_matches('/');
        if name.is_empty() {
            return None;
        }

        let lower = name.to_lowercase();
        self.exact(name)
            .or_else(|| self.case_insensitive(&lower))
            .or_else(|| self.by_suffix(&lower))
    }

    fn metadata(&self, doc: &Document) -> Result<Option<Metadata>, CorpusError> {
        if doc.is_binary() {
            return Ok(None);
        }

        let content = self.read_text(doc)?;
        match frontmatter::parse(&content) {
            Ok(parsed) => Ok(parsed.frontmatter.map(|fm| fm.fields)),
            Err(e) => {
                warn!(path = doc.path(), error = %e, "ignoring unreadable frontmatter");
                Ok(None)
            }
        }
    }

    fn read_binary(&self, doc: &Document) -> Result<Vec<u8>, CorpusError> {
        let path = self.absolute(doc)?;
        fs::read(path)
            .map_err(|source| CorpusError::Read { path: doc.path().to_string(), source })
    }
}
