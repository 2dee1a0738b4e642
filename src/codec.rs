//! Codec facade: the uniform compress/decompress contract over caller memory.
//!
//! [`Codec`] is the capability surface every block codec offers;
//! [`Lz4Codec`] implements it for the LZ4 block format on whichever engine
//! the configuration selects.  A codec value is a pair of plain fields, so it
//! is cheap to copy and safe to share across threads; scratch state lives in
//! each call (or in a caller-owned [`HashTable`]).

use crate::block::match_finder::HashTable;
use crate::buffer::{BufferView, BufferViewMut};
use crate::config::{clamp_acceleration, CodecConfig, EnginePreference, ACCELERATION_DEFAULT};
use crate::engine::{self, Engine};
use crate::error::Result;

/// A block codec over raw byte buffers.
pub trait Codec {
    /// Worst-case compressed size for `input_len` input bytes.
    fn max_compressed_size(&self, input_len: usize) -> usize;

    /// Compress `input` into `output`; returns the number of bytes written.
    ///
    /// Fails with [`OutputTooSmall`](crate::Error::OutputTooSmall) before
    /// writing anything when `output` is shorter than
    /// [`max_compressed_size`](Self::max_compressed_size).
    fn compress(&self, input: &[u8], output: &mut [u8]) -> Result<usize>;

    /// Decompress the block `input` into `output`; returns the number of
    /// bytes produced.
    fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize>;

    /// Name of the engine doing the work.
    fn engine_name(&self) -> &'static str;
}

/// LZ4 block codec bound to one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lz4Codec {
    engine: Engine,
    acceleration: u32,
}

impl Lz4Codec {
    /// Codec on the process-wide engine with default acceleration.
    pub fn new() -> Self {
        Self { engine: *engine::resolve(), acceleration: ACCELERATION_DEFAULT }
    }

    /// Codec built from `config`.
    pub fn with_config(config: &CodecConfig) -> Self {
        let engine = match config.engine {
            EnginePreference::Auto => *engine::resolve(),
            EnginePreference::Software => Engine::software(),
            EnginePreference::Native => Engine::native().unwrap_or_else(Engine::software),
        };
        Self { engine, acceleration: clamp_acceleration(config.acceleration) }
    }

    /// Codec pinned to `engine` with default acceleration.
    pub fn with_engine(engine: Engine) -> Self {
        Self { engine, acceleration: ACCELERATION_DEFAULT }
    }

    /// The bound engine.
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// The acceleration factor in use.
    pub fn acceleration(&self) -> u32 {
        self.acceleration
    }

    /// Compress the rest of `input` at `output`'s cursor, advancing both.
    pub fn compress_view(
        &self,
        input: &mut BufferView<'_>,
        output: &mut BufferViewMut<'_>,
    ) -> Result<usize> {
        let mut table = HashTable::new();
        (self.engine.compress)(input, output, &mut table, self.acceleration)
    }

    /// Decompress the rest of `input` at `output`'s cursor, advancing both.
    pub fn decompress_view(
        &self,
        input: &mut BufferView<'_>,
        output: &mut BufferViewMut<'_>,
    ) -> Result<usize> {
        (self.engine.decompress)(input, output)
    }

    /// [`Codec::compress`] with a caller-owned match table, reset on entry.
    /// Saves the table allocation when compressing many blocks in a row.
    pub fn compress_with_table(
        &self,
        input: &[u8],
        output: &mut [u8],
        table: &mut HashTable,
    ) -> Result<usize> {
        let mut input = BufferView::new(input);
        let mut output = BufferViewMut::new(output);
        (self.engine.compress)(&mut input, &mut output, table, self.acceleration)
    }

    /// Compress into a freshly allocated, exactly sized `Vec`.
    pub fn compress_to_vec(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.max_compressed_size(input.len())];
        let n = self.compress(input, &mut out)?;
        out.truncate(n);
        log::trace!(
            "lzblock: compressed {} -> {} bytes ({})",
            input.len(),
            n,
            self.engine.name()
        );
        Ok(out)
    }

    /// Decompress into a freshly allocated `Vec` of at most `max_output`
    /// bytes.  A block expanding beyond that fails with
    /// [`OutputTooSmall`](crate::Error::OutputTooSmall).
    pub fn decompress_to_vec(&self, input: &[u8], max_output: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; max_output];
        let n = self.decompress(input, &mut out)?;
        out.truncate(n);
        log::trace!(
            "lzblock: decompressed {} -> {} bytes ({})",
            input.len(),
            n,
            self.engine.name()
        );
        Ok(out)
    }
}

impl Default for Lz4Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for Lz4Codec {
    #[inline]
    fn max_compressed_size(&self, input_len: usize) -> usize {
        (self.engine.max_compressed_size)(input_len)
    }

    fn compress(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let mut table = HashTable::new();
        self.compress_with_table(input, output, &mut table)
    }

    fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let mut input = BufferView::new(input);
        let mut output = BufferViewMut::new(output);
        self.decompress_view(&mut input, &mut output)
    }

    fn engine_name(&self) -> &'static str {
        self.engine.name()
    }
}
