//! Revision log: the append-only on-disk change history
//!
//! One file per document, holding a header followed by self-describing
//! chunks, one per revision, in append order. The log is written one chunk
//! at a time and read once, top to bottom, when a document is opened.
//!
//! # Guarantees
//!
//! - Writers only append; nothing is rewritten or truncated
//! - Every chunk is length-prefixed and CRC32-checked
//! - Unknown chunk types are skipped, so older readers tolerate newer writers
//! - Replay order is write order

mod checksum;
mod chunk;
mod codec;
mod errors;
mod reader;
mod writer;

pub use checksum::compute_checksum;
pub use chunk::{ChunkType, FORMAT_VERSION, HEADER_SIZE, MAGIC};
pub use codec::{decode_revision, encode_revision};
pub use errors::{LogError, LogErrorCode, LogResult};
pub use reader::{read_all, RevisionLogReader};
pub use writer::{append_revision, RevisionLogWriter};

/// Frame a chunk of arbitrary type, as a future writer would.
///
/// Exposed so tests and tools can produce chunks this reader must skip.
pub fn encode_chunk(chunk_type: u8, body: &[u8]) -> Vec<u8> {
    chunk::encode_chunk(chunk_type, body)
}
