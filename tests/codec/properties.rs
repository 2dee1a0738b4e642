// Properties over arbitrary inputs: round trip, worst-case bound, and
// rejection of damaged blocks.

use proptest::prelude::*;

use lzblock::{Codec, Error, Lz4Codec};

use crate::block_layout::ambiguous_cut_points;

fn arbitrary_input() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        proptest::collection::vec(any::<u8>(), 0..4096),
        proptest::collection::vec(0u8..3, 0..4096),
        (proptest::collection::vec(any::<u8>(), 1..32), 1usize..200)
            .prop_map(|(unit, times)| unit.repeat(times)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn prop_round_trip(input in arbitrary_input()) {
        let codec = Lz4Codec::new();
        let compressed = codec.compress_to_vec(&input).unwrap();
        let restored = codec.decompress_to_vec(&compressed, input.len()).unwrap();
        prop_assert_eq!(restored, input);
    }

    #[test]
    fn prop_within_bound(input in arbitrary_input()) {
        let codec = Lz4Codec::new();
        let compressed = codec.compress_to_vec(&input).unwrap();
        prop_assert!(compressed.len() <= codec.max_compressed_size(input.len()));
    }

    #[test]
    fn prop_arbitrary_blocks_never_panic(
        block in proptest::collection::vec(any::<u8>(), 0..512),
        cap in 0usize..4096,
    ) {
        let mut out = vec![0u8; cap];
        if let Ok(n) = Lz4Codec::new().decompress(&block, &mut out) {
            prop_assert!(n <= cap);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_truncation_is_rejected(
        input in arbitrary_input().prop_filter("non-empty", |v| !v.is_empty()),
    ) {
        let codec = Lz4Codec::new();
        let compressed = codec.compress_to_vec(&input).unwrap();
        let ambiguous = ambiguous_cut_points(&compressed);
        let mut out = vec![0u8; input.len()];
        for cut in 1..compressed.len() {
            let kept = compressed.len() - cut;
            let result = codec.decompress(&compressed[..kept], &mut out);
            if ambiguous.contains(&kept) {
                // A shorter well-formed block may only yield a prefix.
                if let Ok(n) = result {
                    prop_assert!(n < input.len());
                    prop_assert_eq!(&out[..n], &input[..n]);
                }
                continue;
            }
            prop_assert!(
                matches!(result, Err(Error::CorruptInput { .. })),
                "cut {}: {:?}", cut, result
            );
        }
    }
}
