//! Per-document inclusion decisions.

use std::fmt;

use serde::Serialize;

use super::pattern::FilePattern;
use crate::frontmatter::{Metadata, is_truthy};
use crate::vault::{Corpus, CorpusError, Document};

/// Exclusion rules for one export run.
///
/// Lists are expected to be split and trimmed already; blank entries are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExclusionConfig {
    /// Frontmatter keys that exclude a document when set to a truthy value.
    pub frontmatter_keys: Vec<String>,
    /// Heading substrings whose sections are not scanned for links.
    pub headers: Vec<String>,
    /// Folder names or vault-relative folder paths.
    pub folders: Vec<String>,
    /// Filename patterns, `*` matches any run of characters.
    pub files: Vec<String>,
}

impl ExclusionConfig {
    pub fn is_empty(&self) -> bool {
        self.frontmatter_keys.is_empty()
            && self.headers.is_empty()
            && self.folders.is_empty()
            && self.files.is_empty()
    }

    /// Append the rules of `other` after ours.
    pub fn extend(&mut self, other: ExclusionConfig) {
        self.frontmatter_keys.extend(other.frontmatter_keys);
        self.headers.extend(other.headers);
        self.folders.extend(other.folders);
        self.files.extend(other.files);
    }
}

/// The rule that excluded a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "pattern", rename_all = "lowercase")]
pub enum ExclusionReason {
    Folder(String),
    File(String),
    Frontmatter(String),
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder(p) => write!(f, "folder '{p}'"),
            Self::File(p) => write!(f, "file pattern '{p}'"),
            Self::Frontmatter(k) => write!(f, "frontmatter key '{k}'"),
        }
    }
}

/// Compiled form of an [`ExclusionConfig`].
#[derive(Debug, Clone)]
pub struct ExclusionPolicy {
    folders: Vec<String>,
    files: Vec<FilePattern>,
    keys: Vec<String>,
}

impl ExclusionPolicy {
    pub fn new(config: &ExclusionConfig) -> Self {
        let folders = config
            .folders
            .iter()
            .map(|f| f.trim().trim_matches('/').to_lowercase())
            .filter(|f| !f.is_empty())
            .collect();

        let files = config.files.iter().filter_map(|p| FilePattern::new(p)).collect();

        let keys = config
            .frontmatter_keys
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        Self { folders, files, keys }
    }

    /// Folder and filename checks, which need nothing but the path.
    pub fn check_path(&self, doc: &Document) -> Option<ExclusionReason> {
        let path = doc.path().to_lowercase();
        for folder in &self.folders {
            if path.starts_with(&format!("{folder}/"))
                || path.contains(&format!("/{folder}/"))
                || path == *folder
            {
                return Some(ExclusionReason::Folder(folder.clone()));
            }
        }

        let name = doc.file_name();
        self.files
            .iter()
            .find(|p| p.matches(name))
            .map(|p| ExclusionReason::File(p.as_str().to_string()))
    }

    /// Frontmatter check. Absent metadata never excludes.
    pub fn check_metadata(&self, metadata: Option<&Metadata>) -> Option<ExclusionReason> {
        let metadata = metadata?;
        self.keys
            .iter()
            .find(|k| metadata.get(k.as_str()).is_some_and(is_truthy))
            .map(|k| ExclusionReason::Frontmatter(k.clone()))
    }

    /// Full decision for `doc`, cheapest checks first. Metadata is only read
    /// when the path checks pass and frontmatter keys are configured.
    pub fn evaluate<C: Corpus + ?Sized>(
        &self,
        doc: &Document,
        corpus: &C,
    ) -> Result<Option<ExclusionReason>, CorpusError> {
        if let Some(reason) = self.check_path(doc) {
            return Ok(Some(reason));
        }
        if self.keys.is_empty() {
            return Ok(None);
        }
        let metadata = corpus.metadata(doc)?;
        Ok(self.check_metadata(metadata.as_ref()))
    }
}
