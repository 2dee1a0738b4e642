//! Greedy hash-table match finder for the software engine.
//!
//! The [`HashTable`] maps the hash of a 4-byte prefix to the most recent
//! input position that produced it.  Only one position per bucket is kept:
//! a newer occurrence always evicts the older one.  Candidates read from the
//! table are never trusted: a collision or a stale bucket is rejected by
//! comparing the actual bytes, and a candidate further back than
//! [`MAX_OFFSET`] is treated as a miss.
//!
//! All input access goes through a [`BufferView`], so a logic error here
//! surfaces as a [`BoundsError`] rather than an out-of-bounds read.

use crate::buffer::{BoundsError, BufferView};
use crate::config::{clamp_acceleration, HASH_LOG_MAX, SKIP_TRIGGER};

use super::types::{hash4, hash_log_for, LAST_LITERALS, MAX_OFFSET, MF_LIMIT, MIN_MATCH};

/// Slot value meaning "no position recorded".
pub const EMPTY: u32 = u32::MAX;

// ─────────────────────────────────────────────────────────────────────────────
// Hash table
// ─────────────────────────────────────────────────────────────────────────────

/// Per-call match index: `2^k` slots of most-recent positions.
///
/// A table is reset (and resized within its allocation) at the start of every
/// compress call, so one table can be reused across calls by the same caller.
/// It is never shared between concurrent calls: compression borrows it
/// mutably.
#[derive(Debug, Clone)]
pub struct HashTable {
    slots: Vec<u32>,
    hash_log: u32,
}

impl HashTable {
    /// Allocate a table large enough for any input.
    pub fn new() -> Self {
        Self {
            slots: vec![EMPTY; 1 << HASH_LOG_MAX],
            hash_log: HASH_LOG_MAX,
        }
    }

    /// Clear the table and size it for an input of `input_len` bytes.
    pub fn reset(&mut self, input_len: usize) {
        self.hash_log = hash_log_for(input_len);
        let size = 1usize << self.hash_log;
        if self.slots.len() < size {
            self.slots.resize(size, EMPTY);
        }
        self.slots[..size].fill(EMPTY);
    }

    /// Current hash log (`k` for a `2^k`-slot table).
    #[inline]
    pub fn hash_log(&self) -> u32 {
        self.hash_log
    }

    /// Number of active slots.
    #[inline]
    pub fn size(&self) -> usize {
        1 << self.hash_log
    }

    /// Position recorded under hash `h`, if any.
    #[inline]
    pub fn get(&self, h: usize) -> Option<usize> {
        match self.slots[h] {
            EMPTY => None,
            pos => Some(pos as usize),
        }
    }

    /// Record `pos` under hash `h`, evicting the previous occupant.
    #[inline]
    pub fn put(&mut self, h: usize, pos: usize) {
        debug_assert!(pos < EMPTY as usize);
        self.slots[h] = pos as u32;
    }

    /// Raw slot storage for the native engine.
    #[inline]
    pub(crate) fn slots_mut(&mut self) -> &mut [u32] {
        let size = self.size();
        &mut self.slots[..size]
    }
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Match finder
// ─────────────────────────────────────────────────────────────────────────────

/// A verified back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Input position where the match starts.
    pub start: usize,
    /// Match length in bytes (`>= MIN_MATCH`).
    pub len: usize,
    /// Backward distance to the earlier occurrence (`1..=MAX_OFFSET`).
    pub offset: usize,
}

impl Match {
    /// First input position after the match.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Scans one input block left to right, looking up and recording positions.
pub struct MatchFinder<'t, 'a> {
    table: &'t mut HashTable,
    input: BufferView<'a>,
    acceleration: usize,
    /// Matches may not extend into the last `LAST_LITERALS` bytes.
    match_limit: usize,
    /// A probed position `p` needs `p + step <= mf_limit_plus_one`.
    mf_limit_plus_one: usize,
}

impl<'t, 'a> MatchFinder<'t, 'a> {
    /// Prepare to scan `input`.  The table is reset and position 0 recorded.
    ///
    /// Fails when `input` is shorter than
    /// [`MIN_INPUT_FOR_MATCH`](super::types::MIN_INPUT_FOR_MATCH) bytes.  The
    /// acceleration is clamped into its legal range.
    pub fn new(
        table: &'t mut HashTable,
        input: BufferView<'a>,
        acceleration: u32,
    ) -> Result<Self, BoundsError> {
        let len = input.len();
        if len <= MF_LIMIT {
            return Err(BoundsError { offset: 0, len: MF_LIMIT + 1, bound: len });
        }
        table.reset(len);
        let finder = Self {
            table,
            input,
            acceleration: clamp_acceleration(acceleration) as usize,
            match_limit: len - LAST_LITERALS,
            mf_limit_plus_one: len - MF_LIMIT + 1,
        };
        let h = finder.hash_at(0)?;
        finder.table.put(h, 0);
        Ok(finder)
    }

    /// `true` once `pos` is too close to the end for another match.
    #[inline]
    pub fn exhausted(&self, pos: usize) -> bool {
        pos >= self.mf_limit_plus_one
    }

    #[inline]
    fn hash_at(&self, pos: usize) -> Result<usize, BoundsError> {
        Ok(hash4(self.input.u32_le_at(pos)?, self.table.hash_log()))
    }

    /// Check a table candidate for `pos`: in range and same 4-byte prefix.
    #[inline]
    fn verify(&self, candidate: Option<usize>, pos: usize) -> Result<Option<usize>, BoundsError> {
        let Some(candidate) = candidate else {
            return Ok(None);
        };
        if candidate >= pos || pos - candidate > MAX_OFFSET {
            return Ok(None);
        }
        if self.input.read(candidate, MIN_MATCH)? != self.input.read(pos, MIN_MATCH)? {
            return Ok(None);
        }
        Ok(Some(candidate))
    }

    /// Number of equal bytes at `pos` and `candidate`, not passing the match limit.
    fn common_length(&self, pos: usize, candidate: usize) -> Result<usize, BoundsError> {
        if pos >= self.match_limit {
            return Ok(0);
        }
        let span = self.match_limit - pos;
        let ahead = self.input.read(pos, span)?;
        let behind = self.input.read(candidate, span)?;
        Ok(ahead.iter().zip(behind).take_while(|(a, b)| a == b).count())
    }

    /// Search forward from `from` for the next match.  `anchor` is the first
    /// byte not yet emitted; backward extension never crosses it.
    ///
    /// Returns `None` when the scan reaches the end-of-block limit.
    pub fn find(&mut self, from: usize, anchor: usize) -> Result<Option<Match>, BoundsError> {
        let mut pos = from;
        let mut step = 1usize;
        let mut attempts = self.acceleration << SKIP_TRIGGER;

        let (mut start, mut candidate) = loop {
            let next = pos + step;
            step = attempts >> SKIP_TRIGGER;
            attempts += 1;
            if next > self.mf_limit_plus_one {
                return Ok(None);
            }

            let h = self.hash_at(pos)?;
            let previous = self.table.get(h);
            self.table.put(h, pos);
            if let Some(candidate) = self.verify(previous, pos)? {
                break (pos, candidate);
            }
            pos = next;
        };

        // Catch up: the bytes just before the match may match as well.
        while start > anchor
            && candidate > 0
            && self.input.byte_at(start - 1)? == self.input.byte_at(candidate - 1)?
        {
            start -= 1;
            candidate -= 1;
        }

        let len = MIN_MATCH + self.common_length(start + MIN_MATCH, candidate + MIN_MATCH)?;
        Ok(Some(Match { start, len, offset: start - candidate }))
    }

    /// After a match ending at `pos`, record `pos - 2` and test whether a
    /// second match starts immediately at `pos`.
    ///
    /// Must only be called when [`exhausted`](Self::exhausted) is `false`;
    /// a `pos` below 2 fails with [`BoundsError`].
    pub fn follow_on(&mut self, pos: usize) -> Result<Option<Match>, BoundsError> {
        if pos < 2 {
            return Err(BoundsError { offset: 0, len: 2, bound: pos });
        }
        let h = self.hash_at(pos - 2)?;
        self.table.put(h, pos - 2);

        let h = self.hash_at(pos)?;
        let previous = self.table.get(h);
        self.table.put(h, pos);
        match self.verify(previous, pos)? {
            Some(candidate) => {
                let len = MIN_MATCH + self.common_length(pos + MIN_MATCH, candidate + MIN_MATCH)?;
                Ok(Some(Match { start: pos, len, offset: pos - candidate }))
            }
            None => Ok(None),
        }
    }
}
