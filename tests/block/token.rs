// Token iterator: structure of compressed blocks without decoding them.

use lzblock::block::{Token, Tokens, LAST_LITERALS, MAX_OFFSET};
use lzblock::{Corruption, Engine, Error, Lz4Codec};

fn compress(input: &[u8]) -> Vec<u8> {
    Lz4Codec::with_engine(Engine::software()).compress_to_vec(input).unwrap()
}

fn tokens(block: &[u8]) -> Vec<Token> {
    Tokens::new(block).collect::<Result<_, _>>().unwrap()
}

/// "ABCD", `zeros` zero bytes, "ABCD" again, then 16 bytes of tail.
fn boundary_input(zeros: usize) -> Vec<u8> {
    let mut input = b"ABCD".to_vec();
    input.resize(4 + zeros, 0);
    input.extend_from_slice(b"ABCD");
    input.extend(0x80u8..0x90);
    input
}

#[test]
fn zero_length_literal_runs_are_reported() {
    // A follow-on match directly after a match has an empty literal run.
    let block = compress(&boundary_input(65_531));
    let tokens = tokens(&block);
    assert!(tokens.contains(&Token::Literals(0)));
}

#[test]
fn offset_at_maximum_distance_is_used() {
    let input = boundary_input(65_531);
    assert_eq!(input.len(), 65_555);
    assert_eq!(
        tokens(&compress(&input)),
        vec![
            Token::Literals(5),
            Token::Match { length: 65_530, offset: 1 },
            Token::Literals(0),
            Token::Match { length: 4, offset: MAX_OFFSET },
            Token::Literals(16),
        ]
    );
}

#[test]
fn offset_beyond_maximum_falls_back_to_literals() {
    let input = boundary_input(65_532);
    assert_eq!(
        tokens(&compress(&input)),
        vec![
            Token::Literals(5),
            Token::Match { length: 65_531, offset: 1 },
            Token::Literals(20),
        ]
    );
}

#[test]
fn produced_tracks_decoded_length() {
    let input = b"tic tac toe, tic tac toe, tic tac toe!".repeat(5);
    let block = compress(&input);
    let mut iter = Tokens::new(&block);
    for token in iter.by_ref() {
        token.unwrap();
    }
    assert_eq!(iter.produced(), input.len());
}

#[test]
fn every_block_ends_with_enough_literals() {
    for len in [13usize, 20, 64, 1000] {
        let block = compress(&vec![b'r'; len]);
        match tokens(&block).as_slice() {
            [.., Token::Match { .. }, Token::Literals(n)] => assert!(*n >= LAST_LITERALS),
            other => panic!("len {len}: {other:?}"),
        }
    }
}

#[test]
fn cut_after_literals_stops_with_an_error() {
    let input = [&b"abcdefgh_abcdefgh_"[..], &[b'z'; 12]].concat();
    let block = compress(&input);
    let items: Vec<_> = Tokens::new(&block[..10]).collect();
    assert_eq!(
        items,
        vec![Err(Error::CorruptInput { position: 0, reason: Corruption::TrailingMatchLength })]
    );
}

#[test]
fn truncated_offset_is_reported_once() {
    let block = [0x10, b'a', 0x01];
    let items: Vec<_> = Tokens::new(&block).collect();
    assert_eq!(
        items,
        vec![
            Ok(Token::Literals(1)),
            Err(Error::CorruptInput { position: 2, reason: Corruption::Truncated }),
        ]
    );
}
