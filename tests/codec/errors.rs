// Facade error paths: output sizing, oversized input, corrupt blocks.

use lzblock::{Codec, Corruption, Engine, Error, Lz4Codec};

fn codecs() -> Vec<Lz4Codec> {
    let mut codecs = vec![Lz4Codec::with_engine(Engine::software())];
    codecs.extend(Engine::native().map(Lz4Codec::with_engine));
    codecs
}

// ─────────────────────────────────────────────────────────────────────────────
// Compression
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn output_one_short_of_bound_is_rejected_untouched() {
    let input = vec![0x11u8; 1000];
    for codec in codecs() {
        let bound = codec.max_compressed_size(input.len());
        let mut out = vec![0x77u8; bound - 1];
        assert_eq!(
            codec.compress(&input, &mut out),
            Err(Error::OutputTooSmall { needed: bound, available: bound - 1 })
        );
        assert!(out.iter().all(|&b| b == 0x77));
    }
}

#[test]
fn empty_input_still_needs_the_bound() {
    for codec in codecs() {
        assert_eq!(
            codec.compress(b"", &mut []),
            Err(Error::OutputTooSmall { needed: 16, available: 0 })
        );
        let mut out = [0u8; 16];
        assert_eq!(codec.compress(b"", &mut out), Ok(0));
    }
}

#[test]
fn error_messages_name_the_sizes() {
    let err = Error::InputTooLarge { len: 0x7E00_0001, max: 0x7E00_0000 };
    assert_eq!(
        err.to_string(),
        "input of 2113929217 bytes exceeds the maximum block input of 2113929216 bytes"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Decompression
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn corrupt_blocks_are_rejected_by_every_engine() {
    let cases: &[(&[u8], Corruption)] = &[
        (&[0x10, b'a', 0x00, 0x00, 0x50, 1, 2, 3, 4, 5], Corruption::ZeroOffset),
        (&[0x10, b'a', 0x05, 0x00, 0x50, 1, 2, 3, 4, 5], Corruption::OffsetBeforeStart),
        (&[0x30, b'a'], Corruption::Truncated),
        (&[0x16, b'a', 0x01, 0x00], Corruption::MissingLastLiterals),
        (&[0x16, b'a', 0x01, 0x00, 0x10, 9], Corruption::LastLiteralsTooShort),
    ];
    for codec in codecs() {
        for (block, expected) in cases {
            let mut out = [0u8; 128];
            match codec.decompress(block, &mut out) {
                Err(Error::CorruptInput { reason, .. }) => assert_eq!(reason, *expected),
                other => panic!("{}: {block:?} gave {other:?}", codec.engine_name()),
            }
        }
    }
}

#[test]
fn decompress_output_too_small() {
    for codec in codecs() {
        let block = codec.compress_to_vec(&[3u8; 300]).unwrap();
        let mut out = [0u8; 299];
        assert!(matches!(
            codec.decompress(&block, &mut out),
            Err(Error::OutputTooSmall { available: 299, .. })
        ));
    }
}

#[test]
fn garbage_never_panics() {
    let mut state = 0x2545_F491_4F6C_DD1Du64;
    let mut garbage = vec![0u8; 4096];
    for codec in codecs() {
        for len in [1usize, 2, 7, 64, 512, 4096] {
            for byte in garbage.iter_mut().take(len) {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                *byte = state as u8;
            }
            let mut out = vec![0u8; 8192];
            let _ = codec.decompress(&garbage[..len], &mut out);
        }
    }
}

#[test]
fn corruption_is_flagged() {
    let err = Lz4Codec::new().decompress(&[0x30], &mut [0u8; 8]).unwrap_err();
    assert!(err.is_corrupt());
}
