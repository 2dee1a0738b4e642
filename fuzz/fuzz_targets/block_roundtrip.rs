#![no_main]
use libfuzzer_sys::fuzz_target;
use lzblock::{Codec, Engine, Lz4Codec};

fuzz_target!(|data: &[u8]| {
    let software = Lz4Codec::with_engine(Engine::software());
    let compressed = software.compress_to_vec(data).expect("compress within bound");
    assert!(compressed.len() <= lzblock::max_compressed_size(data.len()));

    let recovered = software
        .decompress_to_vec(&compressed, data.len())
        .expect("valid block must decode");
    assert_eq!(recovered, data);

    // The native engine must agree byte for byte.
    if let Some(native) = Engine::native().map(Lz4Codec::with_engine) {
        assert_eq!(native.compress_to_vec(data).expect("compress"), compressed);
        let mut out = vec![0u8; data.len()];
        assert_eq!(native.decompress(&compressed, &mut out), Ok(data.len()));
    }
});
