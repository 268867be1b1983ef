// BEAM container decoder: envelope validation followed by the chunk loop.
//
// Each iteration reads a tag and a length, hands the bounded payload to the
// matching payload decoder, then moves to `payload_start + padded_len(len)`
// regardless of how much the payload decoder consumed. Decoding is
// all-or-nothing: the first error aborts the pass and no partial
// `ModuleDescriptor` escapes.

use std::str::Utf8Error;

use thiserror::Error;

use super::chunk::{ChunkHeader, ChunkTag, display_tag, padding_len};
use super::cursor::ByteCursor;
use super::envelope::Envelope;
use super::module::ModuleDescriptor;
use super::payload;

// ---------------------------------------------------------------------------
// Decoder error
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("truncated input at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error(
        "malformed envelope: expected \"{}\", found \"{}\"",
        display_tag(.expected),
        display_tag(.found)
    )]
    MalformedEnvelope { expected: [u8; 4], found: [u8; 4] },

    #[error("unknown chunk \"{}\" at offset {offset}", display_tag(.tag))]
    UnknownChunk { tag: [u8; 4], offset: usize },

    #[error("atom {index} is not valid UTF-8")]
    InvalidEncoding {
        index: usize,
        #[source]
        source: Utf8Error,
    },
}

// ---------------------------------------------------------------------------
// Chunk walking
// ---------------------------------------------------------------------------

/// Read one chunk header and take its payload, leaving `cursor` at the
/// start of the next chunk.
fn next_chunk<'a>(
    cursor: &mut ByteCursor<'a>,
) -> Result<(ChunkHeader, ByteCursor<'a>), DecodeError> {
    let header_offset = cursor.offset();
    let raw_tag = cursor.read_tag()?;
    let len = cursor.read_u32_be()?;
    let tag = ChunkTag::from_bytes(&raw_tag).ok_or(DecodeError::UnknownChunk {
        tag: raw_tag,
        offset: header_offset,
    })?;

    let offset = cursor.offset();
    let payload = ByteCursor::with_base(cursor.read_bytes(len as usize)?, offset);
    cursor.skip(padding_len(len))?;

    Ok((ChunkHeader { tag, offset, len }, payload))
}

/// Decode a complete BEAM file held in memory.
///
/// # Example
/// ```
/// let mut file = Vec::new();
/// file.extend_from_slice(b"FOR1");
/// file.extend_from_slice(&4u32.to_be_bytes());
/// file.extend_from_slice(b"BEAM");
///
/// let module = beamfile::beam::decode(&file).unwrap();
/// assert_eq!(module.total_file_size, 4);
/// assert!(module.atoms.is_empty());
/// ```
pub fn decode(data: &[u8]) -> Result<ModuleDescriptor, DecodeError> {
    let mut cursor = ByteCursor::new(data);
    let envelope = Envelope::decode(&mut cursor)?;

    let mut module = ModuleDescriptor {
        total_file_size: envelope.total_file_size,
        ..Default::default()
    };

    while !cursor.at_end() {
        let (header, mut payload) = next_chunk(&mut cursor)?;
        payload::decode_payload(header.tag, &mut payload, &mut module)?;
        debug_assert_eq!(cursor.offset(), header.next_offset());
    }

    Ok(module)
}

/// Validate the envelope and return an iterator over the chunk headers.
///
/// Uses the same alignment rule as [`decode`] but does not interpret
/// payloads. The iterator yields at most one error, then ends.
pub fn chunks(data: &[u8]) -> Result<ChunkIter<'_>, DecodeError> {
    let mut cursor = ByteCursor::new(data);
    let envelope = Envelope::decode(&mut cursor)?;
    Ok(ChunkIter {
        cursor,
        envelope,
        failed: false,
    })
}

/// Iterator over the chunks of a container, created by [`chunks`].
pub struct ChunkIter<'a> {
    cursor: ByteCursor<'a>,
    envelope: Envelope,
    failed: bool,
}

impl ChunkIter<'_> {
    /// The validated envelope.
    pub fn envelope(&self) -> Envelope {
        self.envelope
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<ChunkHeader, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.at_end() {
            return None;
        }
        match next_chunk(&mut self.cursor) {
            Ok((header, _)) => Some(Ok(header)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
