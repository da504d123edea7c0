//! Archive serialization of collected documents.

use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to write archive entry: {0}")]
    Io(#[from] std::io::Error),
}

/// Sink for exported documents, keyed by vault-relative path.
pub trait ArchiveWriter {
    /// Add a text document. Content is raw bytes and is stored unchanged,
    /// whatever its encoding.
    fn add_text(&mut self, path: &str, content: &[u8]) -> Result<(), ArchiveError>;

    fn add_binary(&mut self, path: &str, content: &[u8]) -> Result<(), ArchiveError>;

    /// Finalize the archive and return its bytes.
    fn finish(self) -> Result<Vec<u8>, ArchiveError>
    where
        Self: Sized;
}

/// Builds a zip archive in memory.
///
/// Text entries are deflated; binary entries are stored as-is since most
/// attachment formats are already compressed.
pub struct ZipArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    entries: usize,
}

impl ZipArchiveWriter {
    pub fn new() -> Self {
        Self { zip: ZipWriter::new(Cursor::new(Vec::new())), entries: 0 }
    }

    /// Number of entries written so far.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    fn write_entry(
        &mut self,
        path: &str,
        content: &[u8],
        method: CompressionMethod,
    ) -> Result<(), ArchiveError> {
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .unix_permissions(0o644);
        self.zip.start_file(path, options)?;
        self.zip.write_all(content)?;
        self.entries += 1;
        Ok(())
    }
}

impl Default for ZipArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveWriter for ZipArchiveWriter {
    fn add_text(&mut self, path: &str, content: &[u8]) -> Result<(), ArchiveError> {
        self.write_entry(path, content, CompressionMethod::Deflated)
    }

    fn add_binary(&mut self, path: &str, content: &[u8]) -> Result<(), ArchiveError> {
        self.write_entry(path, content, CompressionMethod::Stored)
    }

    fn finish(self) -> Result<Vec<u8>, ArchiveError> {
        Ok(self.zip.finish()?.into_inner())
    }
}
