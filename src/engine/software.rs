//! Portable engine: every byte goes through a buffer view.

use crate::block::decoder::decode_block;
use crate::block::encoder::encode_block;
use crate::block::match_finder::HashTable;
use crate::block::types::max_compressed_size;
use crate::buffer::{BufferView, BufferViewMut};
use crate::error::Result;

use super::{check_compress_bounds, Engine, EngineKind};

pub(crate) const ENGINE: Engine = Engine {
    kind: EngineKind::Software,
    compress,
    decompress,
    max_compressed_size,
};

/// Compress the rest of `input` into `output`.
pub fn compress(
    input: &mut BufferView<'_>,
    output: &mut BufferViewMut<'_>,
    table: &mut HashTable,
    acceleration: u32,
) -> Result<usize> {
    check_compress_bounds(input.remaining(), output.remaining())?;
    let block = BufferView::new(input.remaining_slice());
    let written = encode_block(block, output, table, acceleration)?;
    input.advance(block.len())?;
    Ok(written)
}

/// Decompress the rest of `input` into `output`.
pub fn decompress(input: &mut BufferView<'_>, output: &mut BufferViewMut<'_>) -> Result<usize> {
    decode_block(input, output)
}
