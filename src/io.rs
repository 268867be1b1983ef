// File-level helpers for loading BEAM modules.
//
// `read_module_file()` reads a module from disk, transparently inflating
// gzip-compressed files (feature `gzip`), decodes it, and reports file
// statistics. A SHA-256 digest of the on-disk bytes is computed when the
// `file-io` feature is enabled.

use std::io;
use std::path::Path;

#[cfg(feature = "file-io")]
use sha2::Digest;
use thiserror::Error;

use crate::beam::decoder::{self, DecodeError};
use crate::beam::envelope::Envelope;
use crate::beam::{ByteCursor, ModuleDescriptor};

/// Leading bytes of a gzip stream.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned alongside a loaded module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStats {
    /// Size of the file as stored (possibly compressed).
    pub file_size: u64,
    /// Size of the buffer handed to the decoder.
    pub decoded_size: u64,
    /// Whether the file was gzip-compressed.
    pub compressed: bool,
    /// Whether the envelope's declared size matches the decoded buffer.
    pub size_consistent: bool,
    /// SHA-256 of the stored bytes (if `file-io` feature is enabled).
    pub sha256: Option<[u8; 32]>,
}

/// A decoded module plus how it was loaded.
#[derive(Debug, Clone)]
pub struct LoadedModule {
    pub module: ModuleDescriptor,
    pub stats: LoadStats,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// I/O error (open, read, inflate).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The module bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Whether `data` starts with the gzip magic.
pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

#[cfg(feature = "gzip")]
fn inflate(data: &[u8]) -> io::Result<Vec<u8>> {
    use std::io::Read;

    let mut out = Vec::with_capacity(data.len() * 4);
    flate2::read::GzDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

/// Inflate `raw` if it is a gzip stream and gzip support is compiled in.
///
/// Returns `None` when the bytes should be decoded as stored.
pub fn inflate_if_compressed(raw: &[u8]) -> io::Result<Option<Vec<u8>>> {
    if !is_gzip(raw) {
        return Ok(None);
    }

    #[cfg(feature = "gzip")]
    {
        let data = inflate(raw)?;
        log::debug!("inflated gzip module: {} -> {} bytes", raw.len(), data.len());
        Ok(Some(data))
    }
    #[cfg(not(feature = "gzip"))]
    {
        log::warn!("module is gzip-compressed but the `gzip` feature is disabled");
        Ok(None)
    }
}

fn read_stored(path: &Path) -> io::Result<Vec<u8>> {
    let raw = std::fs::read(path)?;
    log::debug!("{}: read {} bytes", path.display(), raw.len());
    Ok(raw)
}

/// Read the module at `path`, returning the bytes the decoder should see.
pub fn read_module_bytes(path: &Path) -> Result<Vec<u8>, LoadError> {
    let raw = read_stored(path)?;
    Ok(inflate_if_compressed(&raw)?.unwrap_or(raw))
}

/// Read and decode the module at `path`.
pub fn read_module_file(path: &Path) -> Result<LoadedModule, LoadError> {
    load_module_bytes(&read_stored(path)?)
}

/// Decode a module from its stored bytes, inflating gzip if supported.
pub fn load_module_bytes(raw: &[u8]) -> Result<LoadedModule, LoadError> {
    let inflated = inflate_if_compressed(raw)?;
    let compressed = inflated.is_some();

    let data = inflated.as_deref().unwrap_or(raw);
    let module = decoder::decode(data)?;

    // The decoder already validated the envelope; re-read it for the size check.
    let size_consistent = Envelope::decode(&mut ByteCursor::new(data))
        .map(|env| env.size_matches(data.len()))
        .unwrap_or(false);
    if !size_consistent {
        log::warn!(
            "envelope declares {} bytes after the size field, buffer has {}",
            module.total_file_size,
            data.len().saturating_sub(8)
        );
    }

    #[cfg(feature = "file-io")]
    let sha256 = Some(sha2::Sha256::digest(raw).into());
    #[cfg(not(feature = "file-io"))]
    let sha256: Option<[u8; 32]> = None;

    Ok(LoadedModule {
        module,
        stats: LoadStats {
            file_size: raw.len() as u64,
            decoded_size: data.len() as u64,
            compressed,
            size_consistent,
            sha256,
        },
    })
}

/// Lowercase hex rendering of a digest.
pub fn hex_digest(digest: &[u8]) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
