// BEAM container format decoding.
//
// A BEAM file is an IFF-style container: a 12-byte "FOR1 <size> BEAM"
// envelope followed by tagged, length-prefixed chunks aligned to 4 bytes.
//
// # Modules
//
// - `cursor`   - Bounds-checked big-endian reader
// - `chunk`    - Recognized chunk tags and the alignment rule
// - `envelope` - The FOR1/BEAM envelope
// - `payload`  - Atom table and code header decoders
// - `module`   - The decoded `ModuleDescriptor`
// - `decoder`  - Chunk loop, `decode()` and `chunks()`

pub mod chunk;
pub mod cursor;
pub mod decoder;
pub mod envelope;
pub mod module;
pub mod payload;

// Re-export key types for convenience.
pub use chunk::{CHUNK_ALIGN, ChunkHeader, ChunkTag, RECOGNIZED_TAGS};
pub use cursor::ByteCursor;
pub use decoder::{ChunkIter, DecodeError, chunks, decode};
pub use envelope::{BEAM_FORM, ENVELOPE_LEN, Envelope, IFF_MAGIC};
pub use module::ModuleDescriptor;
