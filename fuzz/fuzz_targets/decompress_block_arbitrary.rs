#![no_main]
use libfuzzer_sys::fuzz_target;
use lzblock::{Codec, Engine, Lz4Codec};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes: errors are expected, panics and disagreement are not.
    let software = Lz4Codec::with_engine(Engine::software());
    let native = Engine::native().map(Lz4Codec::with_engine);

    // Cap at 1 MiB so tiny inputs claiming huge output don't OOM the fuzzer.
    let large = data.len().saturating_mul(255).min(1 << 20);
    for cap in [0usize, 16, data.len(), 4096, large] {
        let mut a = vec![0u8; cap];
        let expected = software.decompress(data, &mut a);
        if let Ok(n) = expected {
            assert!(n <= cap);
        }
        if let Some(native) = &native {
            let mut b = vec![0u8; cap];
            assert_eq!(native.decompress(data, &mut b), expected);
            assert_eq!(a, b);
        }
    }
});
