// Forward-only big-endian reader over an in-memory byte buffer.
//
// Every read either consumes exactly the requested number of bytes or
// fails with `DecodeError::TruncatedInput`; a short read never succeeds.
// Offsets reported in errors are absolute file offsets, including for
// cursors created over a chunk payload with `ByteCursor::with_base`.

use super::decoder::DecodeError;

/// Cursor over an immutable byte slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    /// Absolute offset of `data[0]` within the enclosing file.
    base: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base(data, 0)
    }

    /// Create a cursor over a sub-slice that starts at absolute offset `base`.
    pub fn with_base(data: &'a [u8], base: usize) -> Self {
        Self { data, pos: 0, base }
    }

    /// Absolute offset of the next byte to be read.
    #[inline]
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Number of bytes left in the buffer.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True when no bytes remain.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    #[inline]
    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::TruncatedInput {
                offset: self.offset(),
                needed: n,
                remaining: self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    #[inline]
    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16, DecodeError> {
        self.take_array().map(u16::from_be_bytes)
    }

    pub fn read_u32_be(&mut self) -> Result<u32, DecodeError> {
        self.take_array().map(u32::from_be_bytes)
    }

    /// Read a 4-byte chunk or envelope tag.
    pub fn read_tag(&mut self) -> Result<[u8; 4], DecodeError> {
        self.take_array()
    }

    /// Borrow up to `n` upcoming bytes without consuming them.
    pub fn peek(&self, n: usize) -> &'a [u8] {
        let end = self.pos + n.min(self.remaining());
        &self.data[self.pos..end]
    }

    /// Borrow exactly `n` bytes without copying.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        self.take(n)
    }

    /// Advance past `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.take(n).map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
