//! Revision log reader for startup replay
//!
//! Replay rules:
//! - Chunks are read strictly in file (append) order, once, top to bottom
//! - Chunk types this reader does not know are skipped
//! - A chunk with broken framing, checksum or body stops the replay; every
//!   revision read before it remains valid

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::chunk::{self, ChunkType, FORMAT_VERSION, HEADER_SIZE, MIN_CHUNK_SIZE};
use super::codec::decode_revision;
use super::errors::{LogError, LogResult};
use crate::intern::LoadInterners;
use crate::observability::{log_event, Event};
use crate::revision::Revision;

/// Sequential reader over a revision log file.
pub struct RevisionLogReader {
    path: PathBuf,
    document_id: Option<Arc<str>>,
    reader: BufReader<File>,
    current_offset: u64,
    file_size: u64,
    skipped_chunks: u64,
    revisions_read: u64,
}

impl RevisionLogReader {
    /// Opens a revision log for reading and validates its header.
    ///
    /// An empty file is a valid log with no revisions.
    pub fn open(path: &Path) -> LogResult<Self> {
        let file = File::open(path).map_err(|e| {
            LogError::open_failed(format!("Failed to open revision log: {}", path.display()), e)
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| LogError::open_failed("Failed to read revision log metadata", e))?
            .len();

        let mut reader = Self {
            path: path.to_path_buf(),
            document_id: None,
            reader: BufReader::new(file),
            current_offset: 0,
            file_size,
            skipped_chunks: 0,
            revisions_read: 0,
        };

        if file_size > 0 {
            reader.read_header()?;
        }

        Ok(reader)
    }

    fn read_header(&mut self) -> LogResult<()> {
        if self.file_size < HEADER_SIZE as u64 {
            return Err(LogError::corruption_at_offset(
                0,
                format!("Revision log header truncated: {} bytes", self.file_size),
            ));
        }

        let mut header = [0u8; HEADER_SIZE];
        self.reader.read_exact(&mut header).map_err(|e| {
            LogError::corruption_at_offset(0, format!("Failed to read header: {}", e))
        })?;

        let version = chunk::decode_header(&header)
            .map_err(|e| LogError::corruption_at_offset(0, e.to_string()))?;
        if version != FORMAT_VERSION {
            return Err(LogError::unsupported_version(version));
        }

        self.current_offset = HEADER_SIZE as u64;
        Ok(())
    }

    /// Tags this reader's log lines with the document it replays.
    pub fn for_document(mut self, document_id: impl Into<Arc<str>>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset of the next chunk
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Number of chunks of unknown type skipped so far
    pub fn skipped_chunks(&self) -> u64 {
        self.skipped_chunks
    }

    pub fn revisions_read(&self) -> u64 {
        self.revisions_read
    }

    /// Fields of the warning logged for a skipped chunk
    fn skip_fields(&self, chunk_offset: u64, chunk_type: u8) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("byte_offset", chunk_offset.to_string()),
            ("chunk_type", chunk_type.to_string()),
            ("path", self.path.display().to_string()),
        ];
        if let Some(ref document_id) = self.document_id {
            fields.push(("document_id", document_id.to_string()));
        }
        fields
    }

    /// Reads the next revision, skipping chunks of unknown type.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(revision))` if a revision was read
    /// - `Ok(None)` at a clean end of file
    /// - `Err(LogError)` with code `REVLOG_CORRUPTION` if the current chunk is
    ///   truncated, fails its checksum, or holds a malformed revision
    pub fn read_next(&mut self, interners: &mut LoadInterners) -> LogResult<Option<Revision>> {
        loop {
            if self.current_offset >= self.file_size {
                return Ok(None);
            }

            let chunk_offset = self.current_offset;
            let remaining = self.file_size - chunk_offset;

            if remaining < MIN_CHUNK_SIZE as u64 {
                return Err(LogError::corruption_at_offset(
                    chunk_offset,
                    format!(
                        "Truncated revision log: {} bytes remaining, minimum chunk size is {}",
                        remaining, MIN_CHUNK_SIZE
                    ),
                ));
            }

            let mut len_buf = [0u8; 4];
            self.reader.read_exact(&mut len_buf).map_err(|e| {
                LogError::corruption_at_offset(
                    chunk_offset,
                    format!("Failed to read chunk length: {}", e),
                )
            })?;
            let chunk_length = u32::from_le_bytes(len_buf) as u64;

            if chunk_length < MIN_CHUNK_SIZE as u64 {
                return Err(LogError::corruption_at_offset(
                    chunk_offset,
                    format!("Invalid chunk length: {}", chunk_length),
                ));
            }

            if chunk_length > remaining {
                return Err(LogError::corruption_at_offset(
                    chunk_offset,
                    format!(
                        "Chunk length {} exceeds remaining file size {}",
                        chunk_length, remaining
                    ),
                ));
            }

            let mut chunk_buf = vec![0u8; chunk_length as usize];
            chunk_buf[0..4].copy_from_slice(&len_buf);
            self.reader.read_exact(&mut chunk_buf[4..]).map_err(|e| {
                LogError::corruption_at_offset(
                    chunk_offset,
                    format!("Failed to read chunk body: {}", e),
                )
            })?;

            let (raw, consumed) = chunk::decode_chunk(&chunk_buf)
                .map_err(|e| LogError::corruption_at_offset(chunk_offset, e.to_string()))?;
            self.current_offset += consumed as u64;

            match ChunkType::from_u8(raw.chunk_type) {
                Some(ChunkType::Revision) => {
                    let revision = decode_revision(raw.body, interners)
                        .map_err(|e| LogError::corruption_at_offset(chunk_offset, e.to_string()))?;
                    self.revisions_read += 1;
                    return Ok(Some(revision));
                }
                None => {
                    self.skipped_chunks += 1;
                    let fields = self.skip_fields(chunk_offset, raw.chunk_type);
                    let fields: Vec<(&str, &str)> =
                        fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
                    log_event(Event::UnknownChunkSkipped, &fields);
                }
            }
        }
    }
}

/// Reads every revision in a log file, in write order.
///
/// Uses a fresh set of interners scoped to this call. Any corruption fails
/// the whole read; callers wanting the longest readable prefix drive
/// `RevisionLogReader::read_next` themselves.
pub fn read_all(path: &Path) -> LogResult<Vec<Revision>> {
    let mut reader = RevisionLogReader::open(path)?;
    let mut interners = LoadInterners::new();
    let mut revisions = Vec::new();
    while let Some(revision) = reader.read_next(&mut interners)? {
        revisions.push(revision);
    }
    Ok(revisions)
}
