// Chunk tags recognized inside a BEAM container and the alignment rule
// that separates consecutive chunks.

use std::fmt;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Chunks start on 4-byte boundaries relative to the payload start.
pub const CHUNK_ALIGN: usize = 4;

/// Size of a chunk header: 4-byte tag + big-endian u32 length.
pub const CHUNK_HEADER_LEN: usize = 8;

/// Round `len` up to the next multiple of [`CHUNK_ALIGN`].
///
/// Takes a `u32` length as stored on disk and rounds in `u64`, so
/// `u32::MAX` does not overflow on any target width.
#[inline]
pub fn padded_len(len: u32) -> u64 {
    u64::from(len).div_ceil(CHUNK_ALIGN as u64) * CHUNK_ALIGN as u64
}

/// Number of zero bytes following a payload of `len` bytes.
#[inline]
pub fn padding_len(len: u32) -> usize {
    (padded_len(len) - u64::from(len)) as usize
}

// ---------------------------------------------------------------------------
// Chunk tags
// ---------------------------------------------------------------------------

/// Every chunk kind the decoder accepts.
///
/// Only `AtU8` and `Code` carry decoded fields today; the remaining kinds
/// are recognized so that files containing them decode, and their payload
/// is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChunkTag {
    /// UTF-8 atom table.
    AtU8,
    /// Module attributes (external term format).
    Attr,
    /// Compile information (external term format).
    CInf,
    /// Code header followed by the instruction stream.
    Code,
    /// Debug information.
    Dbgi,
    /// Export table.
    ExpT,
    /// Import table.
    ImpT,
    /// Line number table.
    Line,
    /// Literal table (usually zlib-compressed).
    LitT,
    /// Local function table.
    LocT,
    /// String table.
    StrT,
}

/// All recognized tags, in on-disk spelling order.
pub const RECOGNIZED_TAGS: [ChunkTag; 11] = [
    ChunkTag::AtU8,
    ChunkTag::Attr,
    ChunkTag::CInf,
    ChunkTag::Code,
    ChunkTag::Dbgi,
    ChunkTag::ExpT,
    ChunkTag::ImpT,
    ChunkTag::Line,
    ChunkTag::LitT,
    ChunkTag::LocT,
    ChunkTag::StrT,
];

impl ChunkTag {
    /// Look up a tag by its exact 4-byte spelling.
    pub fn from_bytes(tag: &[u8; 4]) -> Option<Self> {
        let tag = match tag {
            b"AtU8" => Self::AtU8,
            b"Attr" => Self::Attr,
            b"CInf" => Self::CInf,
            b"Code" => Self::Code,
            b"Dbgi" => Self::Dbgi,
            b"ExpT" => Self::ExpT,
            b"ImpT" => Self::ImpT,
            b"Line" => Self::Line,
            b"LitT" => Self::LitT,
            b"LocT" => Self::LocT,
            b"StrT" => Self::StrT,
            _ => return None,
        };
        Some(tag)
    }

    /// The 4-byte on-disk spelling.
    pub fn as_bytes(self) -> &'static [u8; 4] {
        match self {
            Self::AtU8 => b"AtU8",
            Self::Attr => b"Attr",
            Self::CInf => b"CInf",
            Self::Code => b"Code",
            Self::Dbgi => b"Dbgi",
            Self::ExpT => b"ExpT",
            Self::ImpT => b"ImpT",
            Self::Line => b"Line",
            Self::LitT => b"LitT",
            Self::LocT => b"LocT",
            Self::StrT => b"StrT",
        }
    }

    /// The tag as a string slice.
    pub fn as_str(self) -> &'static str {
        // Every spelling above is ASCII.
        std::str::from_utf8(self.as_bytes()).unwrap_or("????")
    }

    /// Human-readable description of the chunk contents.
    pub fn name(self) -> &'static str {
        match self {
            Self::AtU8 => "atom table",
            Self::Attr => "attributes",
            Self::CInf => "compile info",
            Self::Code => "code",
            Self::Dbgi => "debug info",
            Self::ExpT => "export table",
            Self::ImpT => "import table",
            Self::Line => "line table",
            Self::LitT => "literal table",
            Self::LocT => "local function table",
            Self::StrT => "string table",
        }
    }

    /// Whether the decoder extracts fields from this chunk.
    pub fn is_decoded(self) -> bool {
        matches!(self, Self::AtU8 | Self::Code)
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a raw 4-byte tag for diagnostics, escaping non-printable bytes.
pub fn display_tag(tag: &[u8; 4]) -> String {
    tag.iter()
        .flat_map(|&b| std::ascii::escape_default(b))
        .map(char::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Chunk header
// ---------------------------------------------------------------------------

/// Location of one chunk inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub tag: ChunkTag,
    /// Absolute offset of the first payload byte.
    pub offset: usize,
    /// Declared payload length, excluding padding.
    pub len: u32,
}

impl ChunkHeader {
    /// Absolute offset where the next chunk header starts.
    pub fn next_offset(&self) -> usize {
        // The payload was read, so its length fits in `usize`.
        self.offset + padded_len(self.len) as usize
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
