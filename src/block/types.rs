//! LZ4 block format constants, hashing, table sizing, and unaligned memory
//! helpers.
//!
//! The constants in the first section are the format contract: encoders and
//! decoders of both engines agree on them, and changing any of them produces
//! blocks that other LZ4 implementations reject.  See the
//! [LZ4 block format description] for the parsing restrictions they encode.
//!
//! [LZ4 block format description]: https://github.com/lz4/lz4/blob/dev/doc/lz4_Block_format.md

use crate::config::{HASH_LOG_MAX, HASH_LOG_MIN};

// ─────────────────────────────────────────────────────────────────────────────
// Format contract
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum match length encoded in a block.
pub const MIN_MATCH: usize = 4;

/// Largest backward distance a match offset can express.
pub const MAX_OFFSET: usize = 65_535;

/// The last `LAST_LITERALS` bytes of a block containing matches are literals.
pub const LAST_LITERALS: usize = 5;

/// No match may start within the last `MF_LIMIT` bytes of the input.
pub const MF_LIMIT: usize = 12;

/// Inputs shorter than this are emitted as a single literal run.
pub const MIN_INPUT_FOR_MATCH: usize = MF_LIMIT + 1;

/// Bits of the control byte holding the match length.
pub const ML_BITS: u32 = 4;
/// Match-length nibble mask; a nibble equal to it is followed by continuation bytes.
pub const ML_MASK: usize = (1 << ML_BITS) - 1;
/// Literal-run nibble mask; a nibble equal to it is followed by continuation bytes.
pub const RUN_MASK: usize = (1 << (8 - ML_BITS)) - 1;

/// Value of a continuation byte that says "more bytes follow".
pub const CONTINUATION: u8 = 255;

// ─────────────────────────────────────────────────────────────────────────────
// Sizing
// ─────────────────────────────────────────────────────────────────────────────

/// Worst-case compressed size for `input_len` bytes.
///
/// Incompressible input costs one control byte plus one continuation byte per
/// 255 literals; the constant covers the control byte and rounding.
#[inline]
pub fn max_compressed_size(input_len: usize) -> usize {
    input_len
        .saturating_add(input_len / 255)
        .saturating_add(16)
}

/// Hash-table log for an input of `input_len` bytes.
///
/// The table gets the smallest power of two strictly above the input's
/// highest set bit, clamped to `HASH_LOG_MIN..=HASH_LOG_MAX`.
#[inline]
pub fn hash_log_for(input_len: usize) -> u32 {
    let bits = match input_len {
        0 | 1 => 0,
        n => usize::BITS - (n - 1).leading_zeros(),
    };
    bits.clamp(HASH_LOG_MIN, HASH_LOG_MAX)
}

// ─────────────────────────────────────────────────────────────────────────────
// Hashing
// ─────────────────────────────────────────────────────────────────────────────

/// Knuth multiplicative hash of a 4-byte little-endian sequence, keeping the
/// top `hash_log` bits.
#[inline(always)]
pub fn hash4(sequence: u32, hash_log: u32) -> usize {
    debug_assert!(hash_log > 0 && hash_log <= 32);
    (sequence.wrapping_mul(2_654_435_761u32) >> (32 - hash_log)) as usize
}

// ─────────────────────────────────────────────────────────────────────────────
// Unaligned memory helpers (native engine)
//
// All reads go through `ptr::read_unaligned` and are normalised to little
// endian, so the engines agree byte-for-byte on every host.
// ─────────────────────────────────────────────────────────────────────────────

/// Read a little-endian `u32` from an unaligned pointer.
///
/// # Safety
/// `ptr` must be valid for reads of 4 bytes.
#[inline(always)]
pub unsafe fn read_le32(ptr: *const u8) -> u32 {
    u32::from_le(core::ptr::read_unaligned(ptr as *const u32))
}

/// Read a little-endian `u16` from an unaligned pointer.
///
/// # Safety
/// `ptr` must be valid for reads of 2 bytes.
#[inline(always)]
pub unsafe fn read_le16(ptr: *const u8) -> u16 {
    u16::from_le(core::ptr::read_unaligned(ptr as *const u16))
}

/// Write a little-endian `u16` to an unaligned pointer.
///
/// # Safety
/// `ptr` must be valid for writes of 2 bytes.
#[inline(always)]
pub unsafe fn write_le16(ptr: *mut u8, value: u16) {
    core::ptr::write_unaligned(ptr as *mut u16, value.to_le());
}

/// Read a pointer-width word, normalised to little endian.
///
/// # Safety
/// `ptr` must be valid for reads of `size_of::<usize>()` bytes.
#[inline(always)]
pub unsafe fn read_word_le(ptr: *const u8) -> usize {
    usize::from_le(core::ptr::read_unaligned(ptr as *const usize))
}

/// Number of equal low-order bytes given the XOR of two little-endian words.
/// `diff` must be non-zero.
#[inline(always)]
pub fn nb_common_bytes(diff: usize) -> usize {
    debug_assert!(diff != 0);
    (diff.trailing_zeros() >> 3) as usize
}

/// Count how many bytes at `p_in` equal those at `p_match`, stopping at
/// `p_in_limit`.  Compares a word at a time, then finishes byte by byte.
///
/// # Safety
/// - `p_match < p_in <= p_in_limit`, all within one allocation.
/// - `[p_in, p_in_limit)` and the same span from `p_match` are readable.
#[inline(always)]
pub unsafe fn count(mut p_in: *const u8, mut p_match: *const u8, p_in_limit: *const u8) -> usize {
    const STEP: usize = core::mem::size_of::<usize>();
    let start = p_in;

    while (p_in_limit as usize) - (p_in as usize) >= STEP {
        let diff = read_word_le(p_match) ^ read_word_le(p_in);
        if diff != 0 {
            return (p_in as usize - start as usize) + nb_common_bytes(diff);
        }
        p_in = p_in.add(STEP);
        p_match = p_match.add(STEP);
    }
    while p_in < p_in_limit && *p_match == *p_in {
        p_in = p_in.add(1);
        p_match = p_match.add(1);
    }
    p_in as usize - start as usize
}
