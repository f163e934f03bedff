//! File header and chunk framing
//!
//! File layout:
//! - Header: magic `RVLG` (4 bytes), format version (u16 LE)
//! - Zero or more chunks, in append order
//!
//! Chunk layout:
//! - Chunk Length (u32 LE): whole chunk including this field and the checksum
//! - Chunk Type (u8)
//! - Body (variable)
//! - Checksum (u32 LE): CRC32 over length, type and body
//!
//! The length prefix makes every chunk self-describing, so a reader can step
//! over chunk types it does not understand. Only a chunk whose framing or
//! checksum is broken stops a replay.

use std::io;

use super::checksum::{compute_checksum, verify_checksum};

/// Magic bytes at the start of every revision log
pub const MAGIC: [u8; 4] = *b"RVLG";

/// Current format version
pub const FORMAT_VERSION: u16 = 1;

/// Size of the file header in bytes
pub const HEADER_SIZE: usize = 4 + 2;

/// Smallest well-formed chunk: length + type + checksum
pub const MIN_CHUNK_SIZE: usize = 4 + 1 + 4;

/// Known chunk types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChunkType {
    /// One revision: metadata and its ordered changes
    Revision = 1,
}

impl ChunkType {
    /// Convert from u8, returns None for types this reader does not know
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(ChunkType::Revision),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Encode the file header
pub fn encode_header() -> [u8; HEADER_SIZE] {
    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(&MAGIC);
    header[4..6].copy_from_slice(&FORMAT_VERSION.to_le_bytes());
    header
}

/// Check the magic and return the format version
pub fn decode_header(data: &[u8]) -> io::Result<u16> {
    if data.len() < HEADER_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Revision log header truncated",
        ));
    }
    if data[0..4] != MAGIC {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Not a revision log: bad magic",
        ));
    }
    Ok(u16::from_le_bytes([data[4], data[5]]))
}

/// Frame a chunk body with length prefix, type and checksum
pub fn encode_chunk(chunk_type: u8, body: &[u8]) -> Vec<u8> {
    let chunk_length = (4 + 1 + body.len() + 4) as u32;

    let mut chunk = Vec::with_capacity(chunk_length as usize);
    chunk.extend_from_slice(&chunk_length.to_le_bytes());
    chunk.push(chunk_type);
    chunk.extend_from_slice(body);

    let checksum = compute_checksum(&chunk);
    chunk.extend_from_slice(&checksum.to_le_bytes());
    chunk
}

/// A framed chunk whose checksum has been verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChunk<'a> {
    pub chunk_type: u8,
    pub body: &'a [u8],
}

/// Parse one chunk from the start of `data`, verifying its checksum.
///
/// Returns the chunk and the number of bytes consumed.
pub fn decode_chunk(data: &[u8]) -> io::Result<(RawChunk<'_>, usize)> {
    if data.len() < MIN_CHUNK_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Chunk too short",
        ));
    }

    let chunk_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

    if chunk_length < MIN_CHUNK_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid chunk length: {}", chunk_length),
        ));
    }

    if data.len() < chunk_length {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "Chunk truncated: expected {} bytes, got {}",
                chunk_length,
                data.len()
            ),
        ));
    }

    let checksum_offset = chunk_length - 4;
    let stored_checksum = u32::from_le_bytes([
        data[checksum_offset],
        data[checksum_offset + 1],
        data[checksum_offset + 2],
        data[checksum_offset + 3],
    ]);
    let covered = &data[0..checksum_offset];

    if !verify_checksum(covered, stored_checksum) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Checksum mismatch: computed {:08x}, stored {:08x}",
                compute_checksum(covered),
                stored_checksum
            ),
        ));
    }

    Ok((
        RawChunk {
            chunk_type: data[4],
            body: &data[5..checksum_offset],
        },
        chunk_length,
    ))
}
