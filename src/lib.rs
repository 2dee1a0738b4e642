// lzblock: LZ4 block codec with interchangeable native and software engines

//! Raw LZ4 block compression over caller-owned buffers.
//!
//! ```
//! let input = b"abcabcabcabcabcabcabcabcabcabc".to_vec();
//! let mut compressed = vec![0u8; lzblock::max_compressed_size(input.len())];
//! let n = lzblock::compress(&input, &mut compressed)?;
//!
//! let mut restored = vec![0u8; input.len()];
//! let m = lzblock::decompress(&compressed[..n], &mut restored)?;
//! assert_eq!(&restored[..m], &input[..]);
//! # Ok::<(), lzblock::Error>(())
//! ```
//!
//! Blocks are bare LZ4 payloads: no magic, no length prefix, no checksum.
//! The caller keeps track of the decompressed size.

pub mod block;
pub mod buffer;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;

#[cfg(feature = "c-abi")]
pub mod abi;

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use block::match_finder::HashTable;
pub use block::token::{Token, Tokens};
pub use buffer::{BoundsError, BufferView, BufferViewMut};
pub use codec::{Codec, Lz4Codec};
pub use config::{CodecConfig, CodecConfigBuilder, EnginePreference};
pub use engine::{Engine, EngineKind};
pub use error::{Corruption, Error, Result};

/// Worst-case compressed size for `input_len` bytes: `n + n/255 + 16`.
#[inline]
pub fn max_compressed_size(input_len: usize) -> usize {
    block::types::max_compressed_size(input_len)
}

/// Compress `input` into `output` with the process-wide engine.
pub fn compress(input: &[u8], output: &mut [u8]) -> Result<usize> {
    Lz4Codec::new().compress(input, output)
}

/// Decompress the block `input` into `output` with the process-wide engine.
pub fn decompress(input: &[u8], output: &mut [u8]) -> Result<usize> {
    Lz4Codec::new().decompress(input, output)
}

/// `"native"` or `"software"`: the engine the free functions run on.
pub fn engine_name() -> &'static str {
    engine::resolve().name()
}
