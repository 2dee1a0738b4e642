//! Bounds-checked, zero-copy views over caller-owned memory.
//!
//! [`BufferView`] is the read side (compressed or uncompressed input) with a
//! read cursor; [`BufferViewMut`] is the write side with a write cursor.  Both
//! borrow the caller's region for the duration of one call and never grow,
//! reallocate, or retain it.  Every access is validated against
//! `[0, len)` and fails with [`BoundsError`] instead of touching memory
//! outside the region, which makes these views the single chokepoint for
//! memory safety in the software engine.
//!
//! Memory that does not originate from a Rust slice (mmap'd pages, buffers
//! handed over FFI) can be wrapped with the `from_raw_parts` constructors.

use thiserror::Error;

/// An attempted access outside a view's declared region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("access of {len} bytes at offset {offset} outside buffer of {bound} bytes")]
pub struct BoundsError {
    /// Start of the attempted access.
    pub offset: usize,
    /// Length of the attempted access.
    pub len: usize,
    /// Length of the view.
    pub bound: usize,
}

/// Validate `[offset, offset + len)` against `bound`.
#[inline(always)]
fn check(offset: usize, len: usize, bound: usize) -> Result<core::ops::Range<usize>, BoundsError> {
    match offset.checked_add(len) {
        Some(end) if end <= bound => Ok(offset..end),
        _ => Err(BoundsError { offset, len, bound }),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Read side
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only view with a read cursor.
#[derive(Debug, Clone, Copy)]
pub struct BufferView<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BufferView<'a> {
    /// Wrap a slice; the cursor starts at 0.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Wrap `len` bytes starting at `ptr`.
    ///
    /// # Safety
    /// `ptr` must be valid for reads of `len` bytes for `'a`, and the memory
    /// must not be mutated while the view is alive.
    #[inline]
    pub unsafe fn from_raw_parts(ptr: *const u8, len: usize) -> Self {
        Self::new(core::slice::from_raw_parts(ptr, len))
    }

    /// Total length of the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` when the view covers zero bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current read cursor.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes between the cursor and the end of the view.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Move the cursor forward by `n` bytes.
    #[inline]
    pub fn advance(&mut self, n: usize) -> Result<(), BoundsError> {
        let range = check(self.pos, n, self.data.len())?;
        self.pos = range.end;
        Ok(())
    }

    /// Borrow `len` bytes at absolute offset `at` without moving the cursor.
    #[inline]
    pub fn read(&self, at: usize, len: usize) -> Result<&'a [u8], BoundsError> {
        let range = check(at, len, self.data.len())?;
        Ok(&self.data[range])
    }

    /// Read the byte at absolute offset `at`.
    #[inline]
    pub fn byte_at(&self, at: usize) -> Result<u8, BoundsError> {
        self.data
            .get(at)
            .copied()
            .ok_or(BoundsError { offset: at, len: 1, bound: self.data.len() })
    }

    /// Read a little-endian `u32` at absolute offset `at`.
    #[inline]
    pub fn u32_le_at(&self, at: usize) -> Result<u32, BoundsError> {
        let bytes = self.read(at, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Borrow the next `n` bytes and advance past them.
    #[inline]
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], BoundsError> {
        let range = check(self.pos, n, self.data.len())?;
        self.pos = range.end;
        Ok(&self.data[range])
    }

    /// Read one byte at the cursor.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, BoundsError> {
        let b = self.byte_at(self.pos)?;
        self.pos += 1;
        Ok(b)
    }

    /// Read a little-endian `u16` at the cursor.
    #[inline]
    pub fn read_le16(&mut self) -> Result<u16, BoundsError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Everything from the cursor to the end of the view.
    #[inline]
    pub fn remaining_slice(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// The whole underlying region.
    #[inline]
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }
}

impl<'a> From<&'a [u8]> for BufferView<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Write side
// ─────────────────────────────────────────────────────────────────────────────

/// Mutable view with a write cursor.
///
/// Bytes before the cursor are considered "written" and may be read back,
/// which is what match copies do.
#[derive(Debug)]
pub struct BufferViewMut<'a> {
    data: &'a mut [u8],
    pos: usize,
}

impl<'a> BufferViewMut<'a> {
    /// Wrap a mutable slice; the cursor starts at 0.
    #[inline]
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Wrap `len` writable bytes starting at `ptr`.
    ///
    /// # Safety
    /// `ptr` must be valid for reads and writes of `len` bytes for `'a`, and
    /// no other reference to that memory may be used while the view is alive.
    #[inline]
    pub unsafe fn from_raw_parts(ptr: *mut u8, len: usize) -> Self {
        Self::new(core::slice::from_raw_parts_mut(ptr, len))
    }

    /// Total capacity of the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` when the view has zero capacity.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current write cursor (bytes written so far).
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Capacity left after the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Move the cursor forward by `n` bytes, treating them as written.
    #[inline]
    pub fn advance(&mut self, n: usize) -> Result<(), BoundsError> {
        let range = check(self.pos, n, self.data.len())?;
        self.pos = range.end;
        Ok(())
    }

    /// Borrow `len` bytes at absolute offset `at`.
    #[inline]
    pub fn read(&self, at: usize, len: usize) -> Result<&[u8], BoundsError> {
        let range = check(at, len, self.data.len())?;
        Ok(&self.data[range])
    }

    /// Copy `bytes` to absolute offset `at` without moving the cursor.
    #[inline]
    pub fn write(&mut self, at: usize, bytes: &[u8]) -> Result<(), BoundsError> {
        let range = check(at, bytes.len(), self.data.len())?;
        self.data[range].copy_from_slice(bytes);
        Ok(())
    }

    /// Append one byte at the cursor.
    #[inline]
    pub fn put_u8(&mut self, value: u8) -> Result<(), BoundsError> {
        let bound = self.data.len();
        let slot = self
            .data
            .get_mut(self.pos)
            .ok_or(BoundsError { offset: self.pos, len: 1, bound })?;
        *slot = value;
        self.pos += 1;
        Ok(())
    }

    /// Append a little-endian `u16` at the cursor.
    #[inline]
    pub fn put_le16(&mut self, value: u16) -> Result<(), BoundsError> {
        self.put_slice(&value.to_le_bytes())
    }

    /// Append `bytes` at the cursor.
    #[inline]
    pub fn put_slice(&mut self, bytes: &[u8]) -> Result<(), BoundsError> {
        self.write(self.pos, bytes)?;
        self.pos += bytes.len();
        Ok(())
    }

    /// Overwrite the byte at absolute offset `at`.
    #[inline]
    pub fn set_u8(&mut self, at: usize, value: u8) -> Result<(), BoundsError> {
        let bound = self.data.len();
        let slot = self
            .data
            .get_mut(at)
            .ok_or(BoundsError { offset: at, len: 1, bound })?;
        *slot = value;
        Ok(())
    }

    /// Append `len` bytes copied from `offset` bytes behind the cursor.
    ///
    /// Copies one byte at a time, so when `offset < len` the source and
    /// destination overlap and the already-copied bytes are repeated
    /// (run-length expansion).  The source must lie entirely in the written
    /// region: `1 <= offset <= position()`.
    pub fn copy_match(&mut self, offset: usize, len: usize) -> Result<(), BoundsError> {
        let bound = self.data.len();
        if offset == 0 || offset > self.pos {
            return Err(BoundsError {
                offset: self.pos.wrapping_sub(offset),
                len,
                bound: self.pos,
            });
        }
        let dst = check(self.pos, len, bound)?;
        let mut src = self.pos - offset;
        for i in dst {
            self.data[i] = self.data[src];
            src += 1;
        }
        self.pos += len;
        Ok(())
    }

    /// The written prefix `[0, position())`.
    #[inline]
    pub fn written(&self) -> &[u8] {
        &self.data[..self.pos]
    }

    /// The unwritten suffix `[position(), len())`, for engines that fill it
    /// directly and then call [`advance`](Self::advance).
    #[inline]
    pub fn unwritten_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.pos..]
    }
}

impl<'a> From<&'a mut [u8]> for BufferViewMut<'a> {
    fn from(data: &'a mut [u8]) -> Self {
        Self::new(data)
    }
}
