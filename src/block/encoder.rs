//! Token-stream writer for the software engine.
//!
//! Each sequence is laid out as:
//!
//! ```text
//! [control] [run continuation..] [literals..] [offset LE16] [match continuation..]
//! ```
//!
//! The control byte's high nibble holds the literal run length and the low
//! nibble holds `match_len - MIN_MATCH`.  A nibble of 15 is followed by
//! continuation bytes of 255 and one terminating byte below 255, all summed
//! onto the 15.  The final sequence carries literals only.

use crate::buffer::{BoundsError, BufferView, BufferViewMut};

use super::match_finder::{HashTable, Match, MatchFinder};
use super::types::{CONTINUATION, MIN_INPUT_FOR_MATCH, MIN_MATCH, ML_BITS, ML_MASK, RUN_MASK};

/// Appends sequences to an output view.
pub struct BlockEncoder<'o, 'b> {
    out: &'o mut BufferViewMut<'b>,
}

impl<'o, 'b> BlockEncoder<'o, 'b> {
    /// Write at `out`'s cursor.
    pub fn new(out: &'o mut BufferViewMut<'b>) -> Self {
        Self { out }
    }

    /// Write cursor of the underlying view.
    pub fn position(&self) -> usize {
        self.out.position()
    }

    /// Write a length's continuation bytes: `len` is what remains after the
    /// nibble's 15 has been subtracted.
    fn put_continuation(&mut self, mut len: usize) -> Result<(), BoundsError> {
        while len >= CONTINUATION as usize {
            self.out.put_u8(CONTINUATION)?;
            len -= CONTINUATION as usize;
        }
        self.out.put_u8(len as u8)
    }

    /// Write the control byte and the literal run; returns the control byte's
    /// position so the match nibble can be filled in afterwards.
    fn put_literals(&mut self, literals: &[u8]) -> Result<usize, BoundsError> {
        let token_at = self.out.position();
        let run = literals.len();
        if run >= RUN_MASK {
            self.out.put_u8((RUN_MASK << ML_BITS) as u8)?;
            self.put_continuation(run - RUN_MASK)?;
        } else {
            self.out.put_u8((run << ML_BITS) as u8)?;
        }
        self.out.put_slice(literals)?;
        Ok(token_at)
    }

    /// Emit one literal run followed by a match.
    pub fn emit_sequence(&mut self, literals: &[u8], m: &Match) -> Result<(), BoundsError> {
        debug_assert!(m.len >= MIN_MATCH);
        debug_assert!(m.offset >= 1 && m.offset <= u16::MAX as usize);

        let token_at = self.put_literals(literals)?;
        self.out.put_le16(m.offset as u16)?;

        let match_code = m.len - MIN_MATCH;
        let run_nibble = self.out.read(token_at, 1)?[0];
        if match_code >= ML_MASK {
            self.out.set_u8(token_at, run_nibble | ML_MASK as u8)?;
            self.put_continuation(match_code - ML_MASK)?;
        } else {
            self.out.set_u8(token_at, run_nibble | match_code as u8)?;
        }
        Ok(())
    }

    /// Emit the final literal-only sequence.
    pub fn emit_last_literals(&mut self, literals: &[u8]) -> Result<(), BoundsError> {
        self.put_literals(literals).map(|_| ())
    }
}

/// Literal bytes `[anchor, end)` of `input`.
#[inline]
fn literal_span<'a>(input: &BufferView<'a>, anchor: usize, end: usize) -> Result<&'a [u8], BoundsError> {
    input.read(anchor, end - anchor)
}

/// Compress all of `input` as one block, appending at `out`'s cursor.
/// Returns the number of bytes written.
///
/// `out` must have room for [`max_compressed_size`](super::types::max_compressed_size)
/// of the input; running out of room surfaces as a [`BoundsError`].
pub fn encode_block(
    input: BufferView<'_>,
    out: &mut BufferViewMut<'_>,
    table: &mut HashTable,
    acceleration: u32,
) -> Result<usize, BoundsError> {
    let start = out.position();
    let len = input.len();
    if len == 0 {
        return Ok(0);
    }

    let mut enc = BlockEncoder::new(out);
    if len < MIN_INPUT_FOR_MATCH {
        enc.emit_last_literals(input.as_slice())?;
        return Ok(enc.position() - start);
    }

    let mut finder = MatchFinder::new(table, input, acceleration)?;
    let mut anchor = 0;
    let mut found = finder.find(1, anchor)?;

    while let Some(m) = found {
        enc.emit_sequence(literal_span(&input, anchor, m.start)?, &m)?;
        anchor = m.end();
        if finder.exhausted(anchor) {
            break;
        }
        found = match finder.follow_on(anchor)? {
            Some(next) => Some(next),
            None => finder.find(anchor + 1, anchor)?,
        };
    }

    enc.emit_last_literals(literal_span(&input, anchor, len)?)?;
    Ok(enc.position() - start)
}
