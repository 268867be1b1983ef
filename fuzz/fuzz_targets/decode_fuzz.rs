#![no_main]
use libfuzzer_sys::fuzz_target;
use beamfile::beam;

fuzz_target!(|data: &[u8]| {
    // The decoder must never panic, only return errors.
    let _ = beam::decode(data);

    // Also fuzz behind a valid envelope so the chunk loop is reached.
    let mut file = b"FOR1\0\0\0\0BEAM".to_vec();
    file.extend_from_slice(data);
    let decoded = beam::decode(&file);

    // Walking the chunks must agree with decoding about success.
    if let Ok(iter) = beam::chunks(&file) {
        let walked_ok = iter.into_iter().all(|c| c.is_ok());
        if decoded.is_ok() {
            assert!(walked_ok);
        }
    }
});
