// Block encoder: wire layout of whole blocks produced by the software path.
//
// Covers:
//   - empty input produces zero bytes, short input a single literal token
//   - length continuation bytes for long literal runs and long matches
//   - the last LAST_LITERALS bytes are always literals
//   - a caller-owned table gives the same output as a fresh one

use lzblock::block::encoder::encode_block;
use lzblock::block::{max_compressed_size, HashTable, Token, Tokens, LAST_LITERALS};
use lzblock::{BufferView, BufferViewMut};

fn encode(input: &[u8], table: &mut HashTable) -> Vec<u8> {
    let mut buf = vec![0u8; max_compressed_size(input.len())];
    let mut out = BufferViewMut::new(&mut buf);
    let n = encode_block(BufferView::new(input), &mut out, table, 1).unwrap();
    buf.truncate(n);
    buf
}

fn tokens(block: &[u8]) -> Vec<Token> {
    Tokens::new(block).collect::<Result<_, _>>().unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Literal-only blocks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_input_is_empty_block() {
    assert!(encode(b"", &mut HashTable::new()).is_empty());
}

#[test]
fn inputs_below_thirteen_bytes_are_literals() {
    for len in 1..13usize {
        let input: Vec<u8> = vec![b'q'; len];
        let block = encode(&input, &mut HashTable::new());
        assert_eq!(block.len(), len + 1, "len {len}");
        assert_eq!(block[0] as usize, len << 4);
        assert_eq!(tokens(&block), vec![Token::Literals(len)]);
    }
}

#[test]
fn long_literal_run_uses_continuation_bytes() {
    // Big-endian u16 counter: every 4-byte window is distinct.
    let input: Vec<u8> = (0..150u16).flat_map(|i| i.to_be_bytes()).collect();
    let block = encode(&input, &mut HashTable::new());
    // 15 + 255 + 30
    assert_eq!(&block[..3], &[0xF0, 0xFF, 30]);
    assert_eq!(block.len(), 3 + 300);
}

// ─────────────────────────────────────────────────────────────────────────────
// Matches
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn long_run_is_one_match_plus_last_literals() {
    let input = vec![0u8; 1000];
    let block = encode(&input, &mut HashTable::new());
    assert_eq!(
        tokens(&block),
        vec![
            Token::Literals(1),
            Token::Match { length: 1000 - 1 - LAST_LITERALS, offset: 1 },
            Token::Literals(LAST_LITERALS),
        ]
    );
}

#[test]
fn last_literals_are_never_matched() {
    let input = b"0123456789".repeat(20);
    let block = encode(&input, &mut HashTable::new());
    match tokens(&block).last() {
        Some(Token::Literals(n)) => assert!(*n >= LAST_LITERALS),
        other => panic!("block must end with literals, got {other:?}"),
    }
}

#[test]
fn reused_table_matches_fresh_table() {
    let mut table = HashTable::new();
    let first = b"alpha beta gamma alpha beta gamma alpha beta gamma".to_vec();
    let second = vec![0x5Au8; 4096];
    let _ = encode(&first, &mut table);
    let reused = encode(&second, &mut table);
    assert_eq!(reused, encode(&second, &mut HashTable::new()));
    let reused = encode(&first, &mut table);
    assert_eq!(reused, encode(&first, &mut HashTable::new()));
}

#[test]
fn output_short_of_bound_is_a_bounds_error() {
    let input = vec![0xC3u8; 8];
    let mut buf = vec![0u8; 4];
    let mut out = BufferViewMut::new(&mut buf);
    assert!(encode_block(BufferView::new(&input), &mut out, &mut HashTable::new(), 1).is_err());
}
