//! Token-level view of a compressed block.
//!
//! [`Tokens`] walks a block and yields its literal runs and matches without
//! producing any output.  It validates the structure as it goes (truncation,
//! zero offsets, offsets reaching before the start of the output, a block
//! that ends right after a match or on a control byte announcing one) by
//! tracking how many bytes the block would
//! have produced so far.

use crate::buffer::BufferView;
use crate::error::{Corruption, Error, Result};

use super::decoder::read_length;
use super::types::{MIN_MATCH, ML_BITS, ML_MASK, RUN_MASK};

/// One element of a block's token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A run of literal bytes copied verbatim.  Runs of zero are reported too.
    Literals(usize),
    /// A back-reference: copy `length` bytes from `offset` bytes back.
    Match {
        /// Bytes to copy (`>= MIN_MATCH`).
        length: usize,
        /// Backward distance (`1..=MAX_OFFSET`).
        offset: usize,
    },
}

#[derive(Debug, Clone, Copy)]
enum State {
    ExpectLiteralRun,
    /// The match nibble of the current control byte.
    ExpectMatch { nibble: usize },
    Done,
}

/// Iterator over the tokens of one block.  Stops after the first error.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: BufferView<'a>,
    state: State,
    produced: usize,
}

impl<'a> Tokens<'a> {
    /// Start at the beginning of `block`.
    pub fn new(block: &'a [u8]) -> Self {
        let state = if block.is_empty() { State::Done } else { State::ExpectLiteralRun };
        Self { input: BufferView::new(block), state, produced: 0 }
    }

    /// Bytes the tokens yielded so far expand to.
    pub fn produced(&self) -> usize {
        self.produced
    }

    fn literal_run(&mut self) -> Result<Token> {
        let token_at = self.input.position();
        let token = self
            .input
            .read_u8()
            .map_err(|_| Error::corrupt(token_at, Corruption::Truncated))?;

        let mut run = (token >> ML_BITS) as usize;
        if run == RUN_MASK {
            run = read_length(&mut self.input, run, 0)?;
        }
        let literals_at = self.input.position();
        self.input
            .advance(run)
            .map_err(|_| Error::corrupt(literals_at, Corruption::Truncated))?;
        self.produced += run;

        if self.input.remaining() == 0 && token & ML_MASK as u8 != 0 {
            return Err(Error::corrupt(token_at, Corruption::TrailingMatchLength));
        }
        self.state = if self.input.remaining() == 0 {
            State::Done
        } else {
            State::ExpectMatch { nibble: (token as usize) & ML_MASK }
        };
        Ok(Token::Literals(run))
    }

    fn match_token(&mut self, nibble: usize) -> Result<Token> {
        let offset_at = self.input.position();
        let offset = self
            .input
            .read_le16()
            .map_err(|_| Error::corrupt(offset_at, Corruption::Truncated))? as usize;
        if offset == 0 {
            return Err(Error::corrupt(offset_at, Corruption::ZeroOffset));
        }
        if offset > self.produced {
            return Err(Error::corrupt(offset_at, Corruption::OffsetBeforeStart));
        }

        let mut length = nibble;
        if length == ML_MASK {
            length = read_length(&mut self.input, length, 0)?;
        }
        let length = length
            .checked_add(MIN_MATCH)
            .ok_or(Error::corrupt(self.input.position(), Corruption::LengthOverflow))?;
        self.produced = self
            .produced
            .checked_add(length)
            .ok_or(Error::corrupt(self.input.position(), Corruption::LengthOverflow))?;

        if self.input.remaining() == 0 {
            return Err(Error::corrupt(self.input.position(), Corruption::MissingLastLiterals));
        }
        self.state = State::ExpectLiteralRun;
        Ok(Token::Match { length, offset })
    }
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.state {
            State::Done => return None,
            State::ExpectLiteralRun => self.literal_run(),
            State::ExpectMatch { nibble } => self.match_token(nibble),
        };
        if item.is_err() {
            self.state = State::Done;
        }
        Some(item)
    }
}

impl std::iter::FusedIterator for Tokens<'_> {}
