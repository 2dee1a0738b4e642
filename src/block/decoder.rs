//! Software block decoder.
//!
//! Single forward pass over the token stream, all reads through a
//! [`BufferView`] and all writes through a [`BufferViewMut`].  Match copies go
//! through [`BufferViewMut::copy_match`], which copies byte by byte so that an
//! offset shorter than the match length repeats the already-produced bytes.
//!
//! Besides truncation and bad offsets, the decoder enforces the end-of-block
//! parsing restrictions of the format: a block that contains matches must end
//! with a literal run of at least [`LAST_LITERALS`] bytes, and its last match
//! must start at least [`MF_LIMIT`] bytes before the end of the output.  The
//! final control byte must also carry a zero match nibble, which catches a
//! block cut right after some sequence's literals.  A cut after a sequence
//! whose match nibble happens to be zero still parses as a shorter valid
//! block and cannot be told apart.

use crate::buffer::{BufferView, BufferViewMut};
use crate::error::{Corruption, Error, Result};

use super::types::{CONTINUATION, LAST_LITERALS, MF_LIMIT, MIN_MATCH, ML_BITS, ML_MASK, RUN_MASK};

/// Read the continuation bytes of a length whose nibble was 15 and add them to
/// `base`.  Positions in errors are relative to `origin`.
pub(crate) fn read_length(input: &mut BufferView<'_>, base: usize, origin: usize) -> Result<usize> {
    let mut len = base;
    loop {
        let at = input.position() - origin;
        let byte = input
            .read_u8()
            .map_err(|_| Error::corrupt(at, Corruption::Truncated))?;
        len = len
            .checked_add(byte as usize)
            .ok_or(Error::corrupt(at, Corruption::LengthOverflow))?;
        if byte != CONTINUATION {
            return Ok(len);
        }
    }
}

/// Decode the block filling `input` from its cursor to its end, appending the
/// result at `output`'s cursor.  Both cursors advance; returns the number of
/// bytes produced.
///
/// Error positions are offsets into the block, i.e. relative to `input`'s
/// cursor on entry.
pub fn decode_block(input: &mut BufferView<'_>, output: &mut BufferViewMut<'_>) -> Result<usize> {
    let in_start = input.position();
    let out_start = output.position();
    let available = output.len() - out_start;

    if input.remaining() == 0 {
        return Ok(0);
    }

    // Output position (relative to `out_start`) of the last match, if any.
    let mut last_match: Option<usize> = None;

    loop {
        // ── literal run ──────────────────────────────────────────────────────
        let token_at = input.position() - in_start;
        let token = input
            .read_u8()
            .map_err(|_| Error::corrupt(token_at, Corruption::Truncated))?;

        let mut run = (token >> ML_BITS) as usize;
        if run == RUN_MASK {
            run = read_length(input, run, in_start)?;
        }

        let literals_at = input.position() - in_start;
        let literals = input
            .take(run)
            .map_err(|_| Error::corrupt(literals_at, Corruption::Truncated))?;

        let produced = output.position() - out_start;
        if run > available - produced {
            return Err(Error::OutputTooSmall { needed: produced + run, available });
        }
        output.put_slice(literals)?;

        if input.remaining() == 0 {
            let produced = output.position() - out_start;
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
        let offset_at = input.position() - in_start;
        let offset = input
            .read_le16()
            .map_err(|_| Error::corrupt(offset_at, Corruption::Truncated))? as usize;

        let produced = output.position() - out_start;
        if offset == 0 {
            return Err(Error::corrupt(offset_at, Corruption::ZeroOffset));
        }
        if offset > produced {
            return Err(Error::corrupt(offset_at, Corruption::OffsetBeforeStart));
        }

        let mut match_len = (token as usize) & ML_MASK;
        if match_len == ML_MASK {
            match_len = read_length(input, match_len, in_start)?;
        }
        let match_len = match_len
            .checked_add(MIN_MATCH)
            .ok_or(Error::corrupt(input.position() - in_start, Corruption::LengthOverflow))?;

        if match_len > available - produced {
            return Err(Error::OutputTooSmall {
                needed: produced.saturating_add(match_len),
                available,
            });
        }
        output.copy_match(offset, match_len)?;
        last_match = Some(produced);

        if input.remaining() == 0 {
            return Err(Error::corrupt(
                input.position() - in_start,
                Corruption::MissingLastLiterals,
            ));
        }
    }
}
