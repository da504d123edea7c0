//! Linked-note export.
//!
//! This module ties the pieces together:
//! - Walk the link graph from a root document ([`traversal`])
//! - Serialize every included document into an archive ([`archive`])
//! - Persist the archive without ever leaving a partial file behind
//!
//! An export either produces the complete archive or nothing.

pub mod archive;
pub mod traversal;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, warn};

use crate::exclusion::{ExclusionConfig, ExclusionPolicy, ExclusionReason};
use crate::vault::{Corpus, CorpusError, Document};

pub use archive::{ArchiveError, ArchiveWriter, ZipArchiveWriter};
pub use traversal::{Collected, Traversal, VisitedSet};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to read document: {0}")]
    Read(#[source] CorpusError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("failed to save archive to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("export cancelled")]
    Cancelled,
}

/// What to do when a document cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadErrorPolicy {
    /// Fail the whole export.
    #[default]
    Abort,
    /// Log, record the document in the report, and carry on without it.
    Skip,
}

impl ReadErrorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Skip => "skip",
        }
    }
}

impl std::fmt::Display for ReadErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared flag for stopping an export from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// An excluded document and the rule that removed it.
#[derive(Debug, Clone, Serialize)]
pub struct ExcludedEntry {
    pub path: String,
    pub reason: ExclusionReason,
}

/// Summary of an export run.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    pub included: Vec<String>,
    pub excluded: Vec<ExcludedEntry>,
    pub skipped: Vec<String>,
    pub bytes: u64,
}

impl ExportReport {
    /// Report for a traversal that has not been archived (yet).
    pub fn from_collected(root: &Document, collected: &Collected) -> Self {
        Self {
            root: root.path().to_string(),
            destination: None,
            included: collected.visited.iter().map(|d| d.path().to_string()).collect(),
            excluded: collected
                .excluded
                .iter()
                .map(|(d, r)| ExcludedEntry { path: d.path().to_string(), reason: r.clone() })
                .collect(),
            skipped: collected.skipped.iter().map(|d| d.path().to_string()).collect(),
            bytes: 0,
        }
    }
}

/// Runs exports against a corpus with one fixed set of exclusion rules.
pub struct Exporter<'a, C: Corpus + ?Sized> {
    corpus: &'a C,
    config: &'a ExclusionConfig,
    policy: ExclusionPolicy,
    read_policy: ReadErrorPolicy,
    cancel: Option<CancelFlag>,
}

impl<'a, C: Corpus + ?Sized> Exporter<'a, C> {
    pub fn new(corpus: &'a C, config: &'a ExclusionConfig) -> Self {
        Self {
            corpus,
            config,
            policy: ExclusionPolicy::new(config),
            read_policy: ReadErrorPolicy::default(),
            cancel: None,
        }
    }

    pub fn with_read_policy(mut self, read_policy: ReadErrorPolicy) -> Self {
        self.read_policy = read_policy;
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Collect the documents reachable from `root` without writing anything.
    pub fn collect(&self, root: &Document) -> Result<Collected, ExportError> {
        let mut traversal = Traversal::new(self.corpus, &self.policy, &self.config.headers)
            .with_read_policy(self.read_policy);
        if let Some(cancel) = &self.cancel {
            traversal = traversal.with_cancel_flag(cancel);
        }
        traversal.collect(root)
    }

    /// Write every collected document into `writer`, in discovery order.
    ///
    /// Text documents are written from the bytes the traversal scanned, so the
    /// archive holds exactly what links were extracted from. Binary documents
    /// are read here. Documents the traversal already skipped are left out.
    ///
    /// Returns the documents left out because they could not be read under
    /// [`ReadErrorPolicy::Skip`].
    pub fn write_entries<W: ArchiveWriter>(
        &self,
        writer: &mut W,
        collected: &Collected,
    ) -> Result<Vec<Document>, ExportError> {
        let mut skipped = Vec::new();

        for doc in &collected.visited {
            self.check_cancelled()?;

            if collected.skipped.contains(doc) {
                continue;
            }
            if let Some(bytes) = collected.contents.get(doc) {
                writer.add_text(doc.path(), bytes)?;
                continue;
            }

            match self.corpus.read_binary(doc) {
                Ok(bytes) if doc.is_binary() => writer.add_binary(doc.path(), &bytes)?,
                Ok(bytes) => writer.add_text(doc.path(), &bytes)?,
                Err(e) if self.read_policy == ReadErrorPolicy::Skip => {
                    warn!(path = doc.path(), error = %e, "leaving unreadable document out of archive");
                    skipped.push(doc.clone());
                }
                Err(e) => return Err(ExportError::Read(e)),
            }
        }

        Ok(skipped)
    }

    /// Collect, archive and save to `dest`.
    pub fn export_to(&self, root: &Document, dest: &Path) -> Result<ExportReport, ExportError> {
        let collected = self.collect(root)?;

        let mut writer = ZipArchiveWriter::new();
        let skipped = self.write_entries(&mut writer, &collected)?;
        let bytes = writer.finish()?;

        self.check_cancelled()?;
        save_archive(&bytes, dest)?;

        let mut report = ExportReport::from_collected(root, &collected);
        report.skipped.extend(skipped.iter().map(|d| d.path().to_string()));
        report.destination = Some(dest.to_path_buf());
        report.bytes = bytes.len() as u64;

        info!(
            root = root.path(),
            dest = %dest.display(),
            included = report.included.len(),
            excluded = report.excluded.len(),
            skipped = report.skipped.len(),
            "export complete"
        );
        Ok(report)
    }

    fn check_cancelled(&self) -> Result<(), ExportError> {
        match &self.cancel {
            Some(flag) if flag.is_cancelled() => Err(ExportError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Write `bytes` to `dest` atomically.
///
/// Data goes to a temporary file next to `dest` that is renamed into place
/// only once fully written, so a failure never leaves a truncated archive.
pub fn save_archive(bytes: &[u8], dest: &Path) -> Result<(), ExportError> {
    let save_err = |source: io::Error| ExportError::Save { path: dest.to_path_buf(), source };

    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(save_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(save_err)?;
    tmp.write_all(bytes).map_err(save_err)?;
    tmp.as_file().sync_all().map_err(save_err)?;
    tmp.persist(dest).map_err(|e| save_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryCorpus;
    use std::io::{Cursor, Read};
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn corpus() -> MemoryCorpus {
        MemoryCorpus::new()
            .with_text("Home.md", "# Home\n[[Plan]] ![[chart.png]]\n## Private\n[[Diary]]")
            .with_text("Plan.md", "---\nstatus: active\n---\n[[Home]] [[Draft]]")
            .with_text("Draft.md", "---\ndraft: true\n---\n[[Secret]]")
            .with_text("Secret.md", "")
            .with_text("Diary.md", "")
            .with_binary("chart.png", b"\x89PNG\x00\x01")
    }

    fn config() -> ExclusionConfig {
        ExclusionConfig {
            frontmatter_keys: vec!["draft".into()],
            headers: vec!["private".into()],
            ..Default::default()
        }
    }

    fn entry_names(bytes: Vec<u8>) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len()).map(|i| archive.by_index(i).unwrap().name().to_string()).collect()
    }

    #[test]
    fn export_writes_complete_archive() {
        let corpus = corpus();
        let config = config();
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out/home.zip");

        let report = Exporter::new(&corpus, &config)
            .export_to(&corpus.doc("Home.md"), &dest)
            .unwrap();

        assert_eq!(report.included, vec!["Home.md", "Plan.md", "chart.png"]);
        assert_eq!(report.excluded.len(), 1);
        assert_eq!(report.excluded[0].path, "Draft.md");
        assert!(report.skipped.is_empty());
        assert_eq!(report.destination.as_deref(), Some(dest.as_path()));

        let bytes = fs::read(&dest).unwrap();
        assert_eq!(report.bytes, bytes.len() as u64);

        let mut archive = ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        let mut home = String::new();
        archive.by_name("Home.md").unwrap().read_to_string(&mut home).unwrap();
        assert!(home.contains("## Private"), "content is exported unfiltered");
        let mut chart = Vec::new();
        archive.by_name("chart.png").unwrap().read_to_end(&mut chart).unwrap();
        assert_eq!(chart, b"\x89PNG\x00\x01");

        assert_eq!(entry_names(bytes), vec!["Home.md", "Plan.md", "chart.png"]);
    }

    #[test]
    fn failed_export_leaves_no_file() {
        let corpus = corpus().with_unreadable("Broken.md").with_text("Root.md", "[[Broken]]");
        let config = ExclusionConfig::default();
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("root.zip");

        let err = Exporter::new(&corpus, &config)
            .export_to(&corpus.doc("Root.md"), &dest)
            .unwrap_err();

        assert!(matches!(err, ExportError::Read(_)));
        assert!(!dest.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn skip_policy_reports_unreadable_documents() {
        let corpus = corpus().with_unreadable("Broken.md").with_text("Root.md", "[[Broken]] [[Plan]]");
        let config = ExclusionConfig::default();
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("root.zip");

        let report = Exporter::new(&corpus, &config)
            .with_read_policy(ReadErrorPolicy::Skip)
            .export_to(&corpus.doc("Root.md"), &dest)
            .unwrap();

        assert_eq!(report.skipped, vec!["Broken.md"]);
        let names = entry_names(fs::read(&dest).unwrap());
        assert!(!names.contains(&"Broken.md".to_string()));
        assert!(names.contains(&"Plan.md".to_string()));
    }

    #[test]
    fn cancelled_export_writes_nothing() {
        let corpus = corpus();
        let config = config();
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("home.zip");
        let flag = CancelFlag::new();
        flag.cancel();

        let err = Exporter::new(&corpus, &config)
            .with_cancel_flag(flag)
            .export_to(&corpus.doc("Home.md"), &dest)
            .unwrap_err();

        assert!(matches!(err, ExportError::Cancelled));
        assert!(!dest.exists());
    }

    #[test]
    fn save_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("a.zip");
        fs::write(&dest, b"old").unwrap();
        save_archive(b"new", &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn save_into_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let err = save_archive(b"data", &blocker.join("a.zip")).unwrap_err();
        assert!(matches!(err, ExportError::Save { .. }));
    }

    #[test]
    fn report_from_dry_run() {
        let corpus = corpus();
        let config = config();
        let exporter = Exporter::new(&corpus, &config);
        let root = corpus.doc("Home.md");
        let report = ExportReport::from_collected(&root, &exporter.collect(&root).unwrap());
        assert_eq!(report.root, "Home.md");
        assert!(report.destination.is_none());
        assert_eq!(report.bytes, 0);
        assert_eq!(report.included.len(), 3);
    }
}
