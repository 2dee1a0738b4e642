// Codec round trips over the process-wide engine and the software engine.
//
// Covers empty and tiny inputs, text, highly repetitive and incompressible
// data, every compressibility level of the generator, and the vec helpers.
// The raw engine entry points must clamp acceleration like the facade does.

use lzblock::{BufferView, BufferViewMut, Codec, Engine, HashTable, Lz4Codec};

use crate::random_generator::RandomGenerator;

fn codecs() -> Vec<Lz4Codec> {
    let mut codecs = vec![Lz4Codec::new(), Lz4Codec::with_engine(Engine::software())];
    if let Some(native) = Engine::native() {
        codecs.push(Lz4Codec::with_engine(native));
    }
    codecs
}

fn round_trip(codec: &Lz4Codec, input: &[u8]) -> usize {
    let mut compressed = vec![0u8; codec.max_compressed_size(input.len())];
    let n = codec.compress(input, &mut compressed).unwrap();
    assert!(n <= compressed.len());

    let mut restored = vec![0u8; input.len()];
    let m = codec.decompress(&compressed[..n], &mut restored).unwrap();
    assert_eq!(m, input.len());
    assert_eq!(restored, input, "{} engine", codec.engine_name());
    n
}

// ─────────────────────────────────────────────────────────────────────────────
// Edge sizes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_input_compresses_to_nothing() {
    for codec in codecs() {
        assert_eq!(round_trip(&codec, b""), 0);
    }
}

#[test]
fn single_byte() {
    for codec in codecs() {
        assert_eq!(round_trip(&codec, b"x"), 2);
    }
}

#[test]
fn every_length_up_to_forty() {
    let pattern = b"aaaabbbbaaaabbbbccccaaaabbbbaaaabbbbcccc";
    for codec in codecs() {
        for len in 0..=pattern.len() {
            round_trip(&codec, &pattern[..len]);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Content
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn english_text() {
    let text = "It was the best of times, it was the worst of times, it was the age of \
                wisdom, it was the age of foolishness, it was the epoch of belief, it was \
                the epoch of incredulity, it was the season of Light, it was the season of \
                Darkness."
        .repeat(20);
    for codec in codecs() {
        let n = round_trip(&codec, text.as_bytes());
        assert!(n < text.len() / 4, "{} bytes for {}", n, text.len());
    }
}

#[test]
fn one_mebibyte_of_zeros() {
    let input = vec![0u8; 1 << 20];
    for codec in codecs() {
        let n = round_trip(&codec, &input);
        assert!(n < 5000, "{n}");
    }
}

#[test]
fn incompressible_data_stays_within_bound() {
    let mut generator = RandomGenerator::new(1.0);
    let input = generator.next_slice(100_000).to_vec();
    for codec in codecs() {
        let n = round_trip(&codec, &input);
        assert!(n <= lzblock::max_compressed_size(input.len()));
        assert!(n >= input.len(), "random bytes should not shrink");
    }
}

#[test]
fn generated_data_at_every_ratio() {
    for ratio in [0.0, 0.1, 0.25, 0.5, 0.75, 1.0] {
        let mut generator = RandomGenerator::new(ratio);
        for len in [1usize, 13, 99, 100, 101, 4096, 65_535, 65_536, 65_537, 300_000] {
            let input = generator.next_slice(len).to_vec();
            for codec in codecs() {
                round_trip(&codec, &input);
            }
        }
    }
}

#[test]
fn repetitive_fragments_compress_well() {
    let mut generator = RandomGenerator::new(0.1);
    let input = generator.next_slice(500_000).to_vec();
    for codec in codecs() {
        let n = round_trip(&codec, &input);
        assert!(n < input.len() / 4, "{n}");
    }
}

#[test]
fn whole_generator_pool() {
    let generator = RandomGenerator::new(0.5);
    for codec in codecs() {
        round_trip(&codec, &generator.data);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vec helpers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn vec_helpers_round_trip() {
    let input = b"vectors vectors vectors vectors vectors".to_vec();
    for codec in codecs() {
        let compressed = codec.compress_to_vec(&input).unwrap();
        assert_eq!(compressed.len(), round_trip(&codec, &input));
        assert_eq!(codec.decompress_to_vec(&compressed, 1 << 16).unwrap(), input);
    }
}

#[test]
fn acceleration_trades_ratio_for_speed() {
    let mut generator = RandomGenerator::new(0.3);
    let input = generator.next_slice(200_000).to_vec();
    for accel in [1u32, 2, 16, 1000, 65_537] {
        let config = lzblock::CodecConfig::builder().acceleration(accel).build();
        let codec = Lz4Codec::with_config(&config);
        round_trip(&codec, &input);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine entry points
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn engine_entry_points_clamp_zero_acceleration() {
    let mut engines = vec![Engine::software()];
    engines.extend(Engine::native());
    let inputs: [&[u8]; 3] = [
        &[b'a'; 40],
        b"abcdefgh_abcdefgh_zzzzzzzzzzzz",
        b"Lorem ipsum dolor sit amet, lorem ipsum dolor sit amet, lorem ipsum.",
    ];
    for engine in engines {
        for input in inputs {
            let compress_at = |acceleration: u32| {
                let mut buf = vec![0u8; lzblock::max_compressed_size(input.len())];
                let mut out = BufferViewMut::new(&mut buf);
                let n = (engine.compress)(
                    &mut BufferView::new(input),
                    &mut out,
                    &mut HashTable::new(),
                    acceleration,
                )
                .unwrap();
                buf.truncate(n);
                buf
            };
            let block = compress_at(0);
            assert_eq!(block, compress_at(1), "{} engine", engine.name());
            let codec = Lz4Codec::with_engine(engine);
            assert_eq!(codec.decompress_to_vec(&block, input.len()).unwrap(), input);
        }
    }
}
