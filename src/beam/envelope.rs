// The fixed 12-byte envelope at the start of every BEAM file:
//
//   offset 0: "FOR1"   IFF container marker
//   offset 4: u32      size of everything after this field (big-endian)
//   offset 8: "BEAM"   form type

use super::cursor::ByteCursor;
use super::decoder::DecodeError;

pub const IFF_MAGIC: [u8; 4] = *b"FOR1";
pub const BEAM_FORM: [u8; 4] = *b"BEAM";

/// Envelope length in bytes; chunks start at this offset.
pub const ENVELOPE_LEN: usize = 12;

/// Bytes preceding the region counted by the size field.
const SIZE_FIELD_END: usize = 8;

/// Parsed envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Envelope {
    /// Declared size of the file after the size field.
    pub total_file_size: u32,
}

impl Envelope {
    /// Read and validate the envelope, leaving the cursor at the first chunk.
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        expect_tag(cursor, IFF_MAGIC)?;
        let total_file_size = cursor.read_u32_be()?;
        expect_tag(cursor, BEAM_FORM)?;
        Ok(Self { total_file_size })
    }

    /// Whether the declared size agrees with a buffer of `buffer_len` bytes.
    ///
    /// The decoder itself never enforces this.
    pub fn size_matches(&self, buffer_len: usize) -> bool {
        buffer_len.checked_sub(SIZE_FIELD_END) == Some(self.total_file_size as usize)
    }
}

/// Match a magic tag. Bytes that contradict the magic are malformed even
/// when fewer than four remain; only a true prefix is `TruncatedInput`.
fn expect_tag(cursor: &mut ByteCursor<'_>, expected: [u8; 4]) -> Result<(), DecodeError> {
    let present = cursor.peek(expected.len());
    if present != &expected[..present.len()] {
        let mut found = [0u8; 4];
        found[..present.len()].copy_from_slice(present);
        return Err(DecodeError::MalformedEnvelope { expected, found });
    }
    cursor.read_tag()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
