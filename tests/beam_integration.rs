use beamfile::beam::{self, ChunkTag, DecodeError, ModuleDescriptor, RECOGNIZED_TAGS};

fn push_chunk(buf: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) {
    buf.extend_from_slice(tag);
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(payload);
    while buf.len() % 4 != 0 {
        buf.push(0);
    }
}

fn container(chunks: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut body = b"BEAM".to_vec();
    for (tag, payload) in chunks {
        push_chunk(&mut body, tag, payload);
    }
    let mut file = b"FOR1".to_vec();
    file.extend_from_slice(&(body.len() as u32).to_be_bytes());
    file.extend_from_slice(&body);
    file
}

fn atom_table(atoms: &[&str]) -> Vec<u8> {
    let mut buf = (atoms.len() as u32).to_be_bytes().to_vec();
    for a in atoms {
        buf.push(a.len() as u8);
        buf.extend_from_slice(a.as_bytes());
    }
    buf
}

fn code_chunk(fields: [u32; 4], instructions: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    for v in fields {
        buf.extend_from_slice(&v.to_be_bytes());
    }
    buf.extend_from_slice(instructions);
    buf
}

/// The byte layout a compiler emits for a tiny `hello` module.
fn hello_module() -> Vec<u8> {
    container(&[
        (b"AtU8", atom_table(&["hello"])),
        (b"Code", code_chunk([0, 169, 3, 2], &[])),
    ])
}

#[test]
fn hello_scenario() {
    let file = hello_module();
    // AtU8 payload is 10 bytes, padded to 12.
    assert_eq!(&file[12..16], b"AtU8");
    assert_eq!(&file[32..36], b"Code");

    let m = beam::decode(&file).unwrap();
    assert_eq!(m.atoms, vec!["hello"]);
    assert_eq!(m.code_version, 0);
    assert_eq!(m.max_opcode, 169);
    assert_eq!(m.label_count, 3);
    assert_eq!(m.function_count, 2);
    assert_eq!(m.total_file_size, (file.len() - 8) as u32);
    assert_eq!(m.module_name(), Some("hello"));
}

#[test]
fn decode_is_pure() {
    let file = hello_module();
    let before = file.clone();
    let a = beam::decode(&file).unwrap();
    let b = beam::decode(&file).unwrap();
    assert_eq!(a, b);
    assert_eq!(file, before);
}

#[test]
fn envelope_only_module() {
    let file = container(&[]);
    assert_eq!(file.len(), 12);
    let m = beam::decode(&file).unwrap();
    assert_eq!(
        m,
        ModuleDescriptor {
            total_file_size: 4,
            ..Default::default()
        }
    );
}

#[test]
fn bad_magic_is_malformed_regardless_of_body() {
    let mut file = hello_module();
    file[0..4].copy_from_slice(b"FOR2");
    assert!(matches!(
        beam::decode(&file),
        Err(DecodeError::MalformedEnvelope { .. })
    ));

    let mut file = hello_module();
    file[8..12].copy_from_slice(b"BEAN");
    assert!(matches!(
        beam::decode(&file),
        Err(DecodeError::MalformedEnvelope { .. })
    ));

    // Body garbage does not matter once the envelope is wrong.
    let mut file = b"RIFF\0\0\0\0BEAM".to_vec();
    file.extend_from_slice(b"XXXX\0\0\0\0");
    assert!(matches!(
        beam::decode(&file),
        Err(DecodeError::MalformedEnvelope { .. })
    ));
}

#[test]
fn atom_order_is_preserved() {
    let file = container(&[(b"AtU8", atom_table(&["foo", "bar", "baz"]))]);
    let m = beam::decode(&file).unwrap();
    assert_eq!(m.atoms, vec!["foo", "bar", "baz"]);
}

#[test]
fn every_placeholder_chunk_is_skipped() {
    let mut chunks: Vec<(&[u8; 4], Vec<u8>)> = Vec::new();
    for (i, tag) in RECOGNIZED_TAGS
        .iter()
        .filter(|t| !t.is_decoded())
        .enumerate()
    {
        // Lengths 0..=8 cover every padding amount.
        chunks.push((tag.as_bytes(), vec![0xEE; i]));
    }
    chunks.push((b"AtU8", atom_table(&["m", "f"])));
    chunks.push((b"Code", code_chunk([16, 178, 9, 4], &[0x01, 0x10, 0x99])));
    chunks.push((b"Attr", vec![0x83, 0x6A]));

    let m = beam::decode(&container(&chunks)).unwrap();
    assert_eq!(m.atoms, vec!["m", "f"]);
    assert_eq!(
        (m.code_version, m.max_opcode, m.label_count, m.function_count),
        (16, 178, 9, 4)
    );
}

#[test]
fn alignment_invariant_holds_for_every_length() {
    for len in 0u32..=13 {
        let file = container(&[
            (b"LitT", vec![0xAB; len as usize]),
            (b"Code", code_chunk([1, 2, 3, 4], &[])),
        ]);
        let headers: Vec<_> = beam::chunks(&file)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(headers.len(), 2);
        let expected = headers[0].offset + (len as usize).div_ceil(4) * 4;
        // The Code header starts exactly at the padded end of LitT.
        assert_eq!(headers[1].offset - 8, expected, "len {len}");
        assert_eq!(&file[expected..expected + 4], b"Code");
        assert_eq!(beam::decode(&file).unwrap().max_opcode, 2);
    }
}

#[test]
fn truncation_mid_chunk_fails() {
    let file = hello_module();
    // Cut inside the AtU8 payload, inside the Code header, and inside the padding.
    for cut in [22, 25, 30, 36, 41, file.len() - 1] {
        let err = beam::decode(&file[..cut]).unwrap_err();
        assert!(
            matches!(err, DecodeError::TruncatedInput { .. }),
            "cut at {cut}: {err}"
        );
    }
}

#[test]
fn truncated_envelope_fails() {
    for cut in [0, 3, 4, 7, 9, 11] {
        let err = beam::decode(&hello_module()[..cut]).unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedInput { .. }), "cut at {cut}");
    }
}

#[test]
fn short_buffer_with_wrong_magic_is_malformed() {
    let inputs: [&[u8]; 4] = [b"ELF", b"XY", b"FOR1\0\0\0\x04BEX", b"FOR1\0\0\0\x04Z"];
    for input in inputs {
        let err = beam::decode(input).unwrap_err();
        assert!(
            matches!(err, DecodeError::MalformedEnvelope { .. }),
            "{input:?}: {err}"
        );
    }
}

#[test]
fn unknown_tag_is_rejected() {
    let file = container(&[
        (b"AtU8", atom_table(&["x"])),
        (b"XXXX", vec![1, 2, 3, 4]),
    ]);
    match beam::decode(&file) {
        Err(DecodeError::UnknownChunk { tag, offset }) => {
            assert_eq!(&tag, b"XXXX");
            assert_eq!(offset, 12 + 8 + 8);
        }
        other => panic!("expected UnknownChunk, got {other:?}"),
    }
}

#[test]
fn invalid_atom_text_is_rejected() {
    let mut table = atom_table(&["ok"]);
    table[3] = 2;
    table.extend_from_slice(&[2, 0xFF, 0xFE]);
    let err = beam::decode(&container(&[(b"AtU8", table)])).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidEncoding { index: 1, .. }));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn duplicate_atoms_and_repeated_chunks_accumulate() {
    let file = container(&[
        (b"AtU8", atom_table(&["a", "a"])),
        (b"AtU8", atom_table(&["b"])),
    ]);
    let m = beam::decode(&file).unwrap();
    assert_eq!(m.atoms, vec!["a", "a", "b"]);
}

#[test]
fn later_code_chunk_overwrites_header() {
    let file = container(&[
        (b"Code", code_chunk([1, 1, 1, 1], &[])),
        (b"Code", code_chunk([2, 2, 2, 2], &[])),
    ]);
    let m = beam::decode(&file).unwrap();
    assert_eq!(m.code_version, 2);
}

#[test]
fn declared_size_is_not_validated() {
    let mut file = hello_module();
    file[4..8].copy_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
    let m = beam::decode(&file).unwrap();
    assert_eq!(m.total_file_size, u32::MAX);
}

#[test]
fn chunk_listing_matches_file() {
    let file = hello_module();
    let iter = beam::chunks(&file).unwrap();
    assert_eq!(iter.envelope().total_file_size, (file.len() - 8) as u32);
    let tags: Vec<ChunkTag> = iter.map(|h| h.unwrap().tag).collect();
    assert_eq!(tags, vec![ChunkTag::AtU8, ChunkTag::Code]);
}
