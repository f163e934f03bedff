//! Revision log writer
//!
//! - Append-only: existing content is never rewritten or truncated
//! - Each append writes exactly one chunk and fsyncs before returning
//! - The file header is written by the first append to an empty file

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::chunk::{self, ChunkType};
use super::codec::encode_revision;
use super::errors::{LogError, LogResult};
use crate::revision::Revision;

/// Appends revision chunks to a history file.
pub struct RevisionLogWriter {
    path: PathBuf,
    file: File,
    chunks_written: u64,
}

impl RevisionLogWriter {
    /// Opens or creates the history file at `path`.
    ///
    /// Creates parent directories if needed. A new or empty file gets the
    /// format header.
    ///
    /// # Errors
    ///
    /// Returns `REVLOG_APPEND_FAILED` if the file cannot be created, opened or
    /// initialised, `REVLOG_FSYNC_FAILED` if the header cannot be made durable.
    pub fn open(path: &Path) -> LogResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    LogError::append_failed(
                        format!("Failed to create history directory: {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LogError::append_failed(format!("Failed to open revision log: {}", path.display()), e)
            })?;

        let len = file
            .metadata()
            .map_err(|e| LogError::append_failed("Failed to read revision log metadata", e))?
            .len();

        if len == 0 {
            file.write_all(&chunk::encode_header()).map_err(|e| {
                LogError::append_failed(
                    format!("Failed to write revision log header: {}", path.display()),
                    e,
                )
            })?;
            file.sync_all()
                .map_err(|e| LogError::fsync_failed("fsync failed after writing header", e))?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            file,
            chunks_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Chunks appended through this writer
    pub fn chunks_written(&self) -> u64 {
        self.chunks_written
    }

    /// Appends one revision chunk and fsyncs.
    ///
    /// # Errors
    ///
    /// - `REVLOG_APPEND_FAILED` if the write fails
    /// - `REVLOG_FSYNC_FAILED` if fsync fails
    pub fn append(&mut self, revision: &Revision) -> LogResult<()> {
        let body = encode_revision(revision);
        let framed = chunk::encode_chunk(ChunkType::Revision.as_u8(), &body);

        self.file.write_all(&framed).map_err(|e| {
            LogError::append_failed(
                format!("Failed to write revision {}", revision.number().value()),
                e,
            )
        })?;

        self.file.sync_all().map_err(|e| {
            LogError::fsync_failed(
                format!("fsync failed after writing revision {}", revision.number().value()),
                e,
            )
        })?;

        self.chunks_written += 1;
        Ok(())
    }
}

/// Appends a single revision to the history file at `path`.
///
/// Opens the file for the duration of the call, so independent callers can
/// share one path as long as they do not write concurrently.
pub fn append_revision(path: &Path, revision: &Revision) -> LogResult<()> {
    let mut writer = RevisionLogWriter::open(path)?;
    writer.append(revision)
}
