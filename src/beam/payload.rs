// Per-chunk payload decoders.
//
// Each decoder reads from a cursor bounded to its chunk's declared payload,
// so reading past the declared length is `TruncatedInput` rather than a read
// into the following chunk.

use super::chunk::ChunkTag;
use super::cursor::ByteCursor;
use super::decoder::DecodeError;
use super::module::ModuleDescriptor;

/// Decode one chunk payload into `module`.
pub fn decode_payload(
    tag: ChunkTag,
    payload: &mut ByteCursor<'_>,
    module: &mut ModuleDescriptor,
) -> Result<(), DecodeError> {
    match tag {
        ChunkTag::AtU8 => decode_atoms(payload, module),
        ChunkTag::Code => decode_code_header(payload, module),
        // Recognized but not interpreted yet: the dispatcher skips the
        // payload, so these read nothing.
        ChunkTag::Attr
        | ChunkTag::CInf
        | ChunkTag::Dbgi
        | ChunkTag::ExpT
        | ChunkTag::ImpT
        | ChunkTag::Line
        | ChunkTag::LitT
        | ChunkTag::LocT
        | ChunkTag::StrT => Ok(()),
    }
}

/// `AtU8`: u32 count, then `count` x (u8 length, UTF-8 bytes).
fn decode_atoms(c: &mut ByteCursor<'_>, module: &mut ModuleDescriptor) -> Result<(), DecodeError> {
    let count = c.read_u32_be()?;
    // Each atom takes at least one byte; don't trust the count for capacity.
    module
        .atoms
        .reserve((count as usize).min(c.remaining()));

    for _ in 0..count {
        let len = c.read_u8()?;
        let bytes = c.read_bytes(len as usize)?;
        let text = std::str::from_utf8(bytes).map_err(|source| DecodeError::InvalidEncoding {
            index: module.atoms.len(),
            source,
        })?;
        module.atoms.push(text.to_owned());
    }
    Ok(())
}

/// `Code`: version, max opcode, label count, function count. The
/// instruction stream after these fields is left undecoded.
fn decode_code_header(
    c: &mut ByteCursor<'_>,
    module: &mut ModuleDescriptor,
) -> Result<(), DecodeError> {
    module.code_version = c.read_u32_be()?;
    module.max_opcode = c.read_u32_be()?;
    module.label_count = c.read_u32_be()?;
    module.function_count = c.read_u32_be()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
