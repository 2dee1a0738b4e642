//! Error types shared by every engine and the codec facade.
//!
//! All failures are returned to the immediate caller; nothing here retries or
//! logs.  Compression and decompression are deterministic, so retrying an
//! identical call can never succeed where the first one failed.

use thiserror::Error;

pub use crate::buffer::BoundsError;

/// What exactly was wrong with a compressed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Corruption {
    /// The stream ended inside a control byte, continuation run, literal run,
    /// or offset field.
    #[error("truncated block")]
    Truncated,
    /// A match offset of zero.
    #[error("match offset of zero")]
    ZeroOffset,
    /// A match offset pointing before the first byte of output.
    #[error("match offset before start of output")]
    OffsetBeforeStart,
    /// The block ended right after a match instead of with a literal-only token.
    #[error("block does not end with a literal run")]
    MissingLastLiterals,
    /// The final control byte announces a match that never follows.  Encoders
    /// always write a zero match nibble there, so a non-zero one means the
    /// block was cut right after a sequence's literals.
    #[error("final sequence announces a match")]
    TrailingMatchLength,
    /// The final literal run of a block containing matches is shorter than
    /// `LAST_LITERALS`.
    #[error("final literal run too short")]
    LastLiteralsTooShort,
    /// The last match starts within the final `MF_LIMIT` bytes of output.
    #[error("last match too close to end of block")]
    MatchTooCloseToEnd,
    /// A run or match length does not fit in `usize`.
    #[error("length overflows usize")]
    LengthOverflow,
}

/// Errors returned by block compression and decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A buffer view was accessed outside its declared region.
    #[error(transparent)]
    Bounds(#[from] BoundsError),

    /// The destination cannot hold the operation's output.
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    OutputTooSmall {
        /// Bytes required.
        needed: usize,
        /// Bytes available in the destination.
        available: usize,
    },

    /// The source exceeds the largest input an LZ4 block can describe.
    #[error("input of {len} bytes exceeds the maximum block input of {max} bytes")]
    InputTooLarge {
        /// Input length.
        len: usize,
        /// Largest accepted input length.
        max: usize,
    },

    /// The compressed stream is malformed.
    #[error("corrupt input at byte {position}: {reason}")]
    CorruptInput {
        /// Offset into the compressed stream where the problem was detected.
        position: usize,
        /// What was wrong.
        reason: Corruption,
    },
}

impl Error {
    /// Shorthand for a [`Error::CorruptInput`].
    #[inline]
    pub(crate) fn corrupt(position: usize, reason: Corruption) -> Self {
        Error::CorruptInput { position, reason }
    }

    /// Returns `true` for [`Error::CorruptInput`].
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Error::CorruptInput { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
