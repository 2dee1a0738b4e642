//! Native engine: the block codec over raw pointers.
//!
//! Same algorithm, same output, same errors as the software engine, but all
//! bounds are established once at entry and the inner loops then run on raw
//! pointers: 4-byte hashing loads, word-at-a-time match extension via
//! [`count`], and `copy_nonoverlapping` for literal runs and non-overlapping
//! match copies.  No copy ever writes past the end of a run, so callers do
//! not need to reserve slack after the output.
//!
//! # Availability
//!
//! The engine compiles everywhere but is only handed out by
//! [`Engine::native`](super::Engine::native) when [`is_available`] holds:
//! the `native` feature is on, `build.rs` recognised the target as a 64-bit
//! little-endian `x86_64`/`aarch64` (`cfg(native_engine)`), and the CPU probe
//! succeeds.
//!
//! All `unsafe` blocks carry a `// SAFETY:` comment.

use core::ptr;

use crate::block::match_finder::{HashTable, EMPTY};
use crate::block::types::{
    count, hash4, max_compressed_size, read_le16, read_le32, write_le16, CONTINUATION,
    LAST_LITERALS, MAX_OFFSET, MF_LIMIT, MIN_INPUT_FOR_MATCH, MIN_MATCH, ML_BITS, ML_MASK,
    RUN_MASK,
};
use crate::buffer::{BufferView, BufferViewMut};
use crate::config::{clamp_acceleration, SKIP_TRIGGER};
use crate::error::{Corruption, Error, Result};

use super::{check_compress_bounds, Engine, EngineKind};

pub(crate) const ENGINE: Engine = Engine {
    kind: EngineKind::Native,
    compress,
    decompress,
    max_compressed_size,
};

/// `true` when this build and host can run the native engine.
pub fn is_available() -> bool {
    cfg!(all(feature = "native", native_engine)) && cpu_supported()
}

#[cfg(target_arch = "x86_64")]
fn cpu_supported() -> bool {
    std::is_x86_feature_detected!("sse2")
}

#[cfg(target_arch = "aarch64")]
fn cpu_supported() -> bool {
    true
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn cpu_supported() -> bool {
    false
}

// ─────────────────────────────────────────────────────────────────────────────
// Compression
// ─────────────────────────────────────────────────────────────────────────────

/// Compress the rest of `input` into `output`.
pub fn compress(
    input: &mut BufferView<'_>,
    output: &mut BufferViewMut<'_>,
    table: &mut HashTable,
    acceleration: u32,
) -> Result<usize> {
    let src = input.remaining_slice();
    check_compress_bounds(src.len(), output.remaining())?;

    let written = if src.len() < MIN_INPUT_FOR_MATCH {
        // SAFETY: the bounds check guarantees room for the worst case.
        unsafe { emit_short(src, output.unwritten_mut()) }
    } else {
        table.reset(src.len());
        let hash_log = table.hash_log();
        // SAFETY: `src` has at least MIN_INPUT_FOR_MATCH bytes, the output has
        // room for max_compressed_size(src.len()), and every slot index the
        // scanner computes is below 2^hash_log, the slice's length.
        unsafe {
            compress_raw(
                src,
                output.unwritten_mut(),
                table.slots_mut(),
                hash_log,
                clamp_acceleration(acceleration) as usize,
            )
        }
    };

    output.advance(written)?;
    input.advance(src.len())?;
    Ok(written)
}

/// Write a length's continuation bytes (the part above the nibble's 15).
///
/// # Safety
/// `op` must have room for `len / 255 + 1` bytes.
#[inline(always)]
unsafe fn put_length(mut op: *mut u8, mut len: usize) -> *mut u8 {
    while len >= CONTINUATION as usize {
        *op = CONTINUATION;
        op = op.add(1);
        len -= CONTINUATION as usize;
    }
    *op = len as u8;
    op.add(1)
}

/// Write a control byte (match nibble zero) and `run` literals from `lit`.
/// Returns the control byte's pointer and the new output pointer.
///
/// # Safety
/// `lit..lit+run` readable; `op` has room for the run, its control byte and
/// its continuation bytes.
#[inline(always)]
unsafe fn put_literals(mut op: *mut u8, lit: *const u8, run: usize) -> (*mut u8, *mut u8) {
    let token = op;
    op = op.add(1);
    if run >= RUN_MASK {
        *token = (RUN_MASK << ML_BITS) as u8;
        op = put_length(op, run - RUN_MASK);
    } else {
        *token = (run << ML_BITS) as u8;
    }
    ptr::copy_nonoverlapping(lit, op, run);
    (token, op.add(run))
}

/// Whole input as one literal run.
///
/// # Safety
/// `dst` must hold at least `max_compressed_size(src.len())` bytes.
unsafe fn emit_short(src: &[u8], dst: &mut [u8]) -> usize {
    if src.is_empty() {
        return 0;
    }
    let start = dst.as_mut_ptr();
    let (_, op) = put_literals(start, src.as_ptr(), src.len());
    op as usize - start as usize
}

/// Scanner state for one block.
struct Scanner<'t> {
    base: *const u8,
    table: &'t mut [u32],
    hash_log: u32,
    acceleration: usize,
    match_limit: usize,
    mf_limit_plus_one: usize,
}

impl Scanner<'_> {
    /// # Safety
    /// `pos + 4 <= len`.
    #[inline(always)]
    unsafe fn hash_at(&self, pos: usize) -> usize {
        hash4(read_le32(self.base.add(pos)), self.hash_log)
    }

    /// Swap `pos` into slot `h`, returning the previous occupant.
    #[inline(always)]
    fn exchange(&mut self, h: usize, pos: usize) -> u32 {
        // SAFETY: `h < 2^hash_log == table.len()` by construction of hash4.
        let slot = unsafe { self.table.get_unchecked_mut(h) };
        core::mem::replace(slot, pos as u32)
    }

    /// # Safety
    /// `pos + 4 <= len`.
    #[inline(always)]
    unsafe fn verify(&self, previous: u32, pos: usize) -> Option<usize> {
        if previous == EMPTY {
            return None;
        }
        let candidate = previous as usize;
        if candidate >= pos
            || pos - candidate > MAX_OFFSET
            || read_le32(self.base.add(candidate)) != read_le32(self.base.add(pos))
        {
            return None;
        }
        Some(candidate)
    }

    /// # Safety
    /// `candidate < pos`, both within the input.
    #[inline(always)]
    unsafe fn common_length(&self, pos: usize, candidate: usize) -> usize {
        if pos >= self.match_limit {
            return 0;
        }
        count(self.base.add(pos), self.base.add(candidate), self.base.add(self.match_limit))
    }

    /// Next match at or after `from`, as `(start, len, offset)`.
    ///
    /// # Safety
    /// `anchor <= from`, and `from` leaves room for a 4-byte hash load.
    unsafe fn find(&mut self, from: usize, anchor: usize) -> Option<(usize, usize, usize)> {
        let mut forward_pos = from;
        let mut step = 1usize;
        let mut attempts = self.acceleration << SKIP_TRIGGER;

        let (mut start, mut candidate) = loop {
            let pos = forward_pos;
            forward_pos = pos + step;
            step = attempts >> SKIP_TRIGGER;
            attempts += 1;
            if forward_pos > self.mf_limit_plus_one {
                return None;
            }

            let h = self.hash_at(pos);
            let previous = self.exchange(h, pos);
            if let Some(candidate) = self.verify(previous, pos) {
                break (pos, candidate);
            }
        };

        while start > anchor
            && candidate > 0
            && *self.base.add(start - 1) == *self.base.add(candidate - 1)
        {
            start -= 1;
            candidate -= 1;
        }

        let len = MIN_MATCH + self.common_length(start + MIN_MATCH, candidate + MIN_MATCH);
        Some((start, len, start - candidate))
    }

    /// Record `pos - 2`, then test for a match starting right at `pos`.
    ///
    /// # Safety
    /// `pos < mf_limit_plus_one`.
    unsafe fn follow_on(&mut self, pos: usize) -> Option<(usize, usize, usize)> {
        let h = self.hash_at(pos - 2);
        self.exchange(h, pos - 2);

        let h = self.hash_at(pos);
        let previous = self.exchange(h, pos);
        let candidate = self.verify(previous, pos)?;
        let len = MIN_MATCH + self.common_length(pos + MIN_MATCH, candidate + MIN_MATCH);
        Some((pos, len, pos - candidate))
    }
}

/// # Safety
/// - `src.len() >= MIN_INPUT_FOR_MATCH`.
/// - `dst.len() >= max_compressed_size(src.len())`.
/// - `table.len() == 1 << hash_log`, all slots `EMPTY`.
unsafe fn compress_raw(
    src: &[u8],
    dst: &mut [u8],
    table: &mut [u32],
    hash_log: u32,
    acceleration: usize,
) -> usize {
    let len = src.len();
    let base = src.as_ptr();
    let ostart = dst.as_mut_ptr();
    let mut op = ostart;

    let mut scanner = Scanner {
        base,
        table,
        hash_log,
        acceleration,
        match_limit: len - LAST_LITERALS,
        mf_limit_plus_one: len - MF_LIMIT + 1,
    };
    let h = scanner.hash_at(0);
    scanner.exchange(h, 0);

    let mut anchor = 0usize;
    let mut found = scanner.find(1, anchor);

    while let Some((start, match_len, offset)) = found {
        let (token, mut next) = put_literals(op, base.add(anchor), start - anchor);
        write_le16(next, offset as u16);
        next = next.add(2);

        let code = match_len - MIN_MATCH;
        if code >= ML_MASK {
            *token |= ML_MASK as u8;
            next = put_length(next, code - ML_MASK);
        } else {
            *token |= code as u8;
        }
        op = next;

        anchor = start + match_len;
        if anchor >= scanner.mf_limit_plus_one {
            break;
        }
        found = match scanner.follow_on(anchor) {
            Some(m) => Some(m),
            None => scanner.find(anchor + 1, anchor),
        };
    }

    let (_, end) = put_literals(op, base.add(anchor), len - anchor);
    end as usize - ostart as usize
}

// ─────────────────────────────────────────────────────────────────────────────
// Decompression
// ─────────────────────────────────────────────────────────────────────────────

/// Decompress the rest of `input` into `output`.
pub fn decompress(input: &mut BufferView<'_>, output: &mut BufferViewMut<'_>) -> Result<usize> {
    let src = input.remaining_slice();
    // SAFETY: both slices are live for the call and do not overlap (one is
    // borrowed shared, the other exclusively).
    let produced = unsafe { decompress_raw(src, output.unwritten_mut())? };
    output.advance(produced)?;
    input.advance(src.len())?;
    Ok(produced)
}

/// Continuation bytes of a length whose nibble was 15, added to `base`.
///
/// # Safety
/// `*ip <= iend`, both within the same allocation starting at `istart`.
#[inline(always)]
unsafe fn read_length(
    ip: &mut *const u8,
    iend: *const u8,
    istart: *const u8,
    base: usize,
) -> Result<usize> {
    let mut len = base;
    loop {
        let at = *ip as usize - istart as usize;
        if *ip >= iend {
            return Err(Error::corrupt(at, Corruption::Truncated));
        }
        let byte = **ip;
        *ip = (*ip).add(1);
        len = len
            .checked_add(byte as usize)
            .ok_or(Error::corrupt(at, Corruption::LengthOverflow))?;
        if byte != CONTINUATION {
            return Ok(len);
        }
    }
}

/// Copy `len` bytes from `offset` bytes behind `op`.  Equivalent to a
/// byte-by-byte forward copy for every `offset >= 1`.
///
/// # Safety
/// `op - offset` is within the produced output and `op + len` within capacity.
#[inline(always)]
unsafe fn copy_match(op: *mut u8, offset: usize, len: usize) {
    let src = op.sub(offset);
    if offset >= len {
        ptr::copy_nonoverlapping(src, op, len);
        return;
    }

    let mut copied = 0usize;
    if offset >= 8 {
        // Each 8-byte chunk reads only bytes finalised by earlier chunks.
        while copied + 8 <= len {
            ptr::copy_nonoverlapping(src.add(copied), op.add(copied), 8);
            copied += 8;
        }
    }
    while copied < len {
        *op.add(copied) = *src.add(copied);
        copied += 1;
    }
}

/// # Safety
/// `src` and `dst` must not overlap.
unsafe fn decompress_raw(src: &[u8], dst: &mut [u8]) -> Result<usize> {
    let istart = src.as_ptr();
    let iend = istart.add(src.len());
    let mut ip = istart;

    let ostart = dst.as_mut_ptr();
    let available = dst.len();
    let mut op = ostart;

    if src.is_empty() {
        return Ok(0);
    }

    let at = |p: *const u8| p as usize - istart as usize;
    let mut last_match: Option<usize> = None;

    loop {
        // ── literal run ──────────────────────────────────────────────────────
        let token_at = at(ip);
        if ip >= iend {
            return Err(Error::corrupt(token_at, Corruption::Truncated));
        }
        let token = *ip;
        ip = ip.add(1);

        let mut run = (token >> ML_BITS) as usize;
        if run == RUN_MASK {
            run = read_length(&mut ip, iend, istart, run)?;
        }
        if run > iend as usize - ip as usize {
            return Err(Error::corrupt(at(ip), Corruption::Truncated));
        }

        let produced = op as usize - ostart as usize;
        if run > available - produced {
            return Err(Error::OutputTooSmall { needed: produced + run, available });
        }
        ptr::copy_nonoverlapping(ip, op, run);
        ip = ip.add(run);
        op = op.add(run);

        if ip == iend {
            let produced = op as usize - ostart as usize;
            if token & ML_MASK as u8 != 0 {
                return Err(Error::corrupt(token_at, Corruption::TrailingMatchLength));
            }
            if let Some(match_at) = last_match {
                if run < LAST_LITERALS {
                    return Err(Error::corrupt(token_at, Corruption::LastLiteralsTooShort));
                }
                if match_at + MF_LIMIT > produced {
                    return Err(Error::corrupt(token_at, Corruption::MatchTooCloseToEnd));
                }
            }
            return Ok(produced);
        }

        // ── match ────────────────────────────────────────────────────────────
        let offset_at = at(ip);
        if (iend as usize - ip as usize) < 2 {
            return Err(Error::corrupt(offset_at, Corruption::Truncated));
        }
        let offset = read_le16(ip) as usize;
        ip = ip.add(2);

        let produced = op as usize - ostart as usize;
        if offset == 0 {
            return Err(Error::corrupt(offset_at, Corruption::ZeroOffset));
        }
        if offset > produced {
            return Err(Error::corrupt(offset_at, Corruption::OffsetBeforeStart));
        }

        let mut match_len = (token as usize) & ML_MASK;
        if match_len == ML_MASK {
            match_len = read_length(&mut ip, iend, istart, match_len)?;
        }
        let match_len = match_len
            .checked_add(MIN_MATCH)
            .ok_or(Error::corrupt(at(ip), Corruption::LengthOverflow))?;

        if match_len > available - produced {
            return Err(Error::OutputTooSmall {
                needed: produced.saturating_add(match_len),
                available,
            });
        }
        copy_match(op, offset, match_len);
        op = op.add(match_len);
        last_match = Some(produced);

        if ip == iend {
            return Err(Error::corrupt(at(ip), Corruption::MissingLastLiterals));
        }
    }
}
