//! Compress/decompress engines and the process-wide engine selector.
//!
//! An [`Engine`] is a capability set: plain function pointers for one
//! implementation of the block codec.  Two implementations exist:
//!
//! | Engine     | Memory access                       | Availability                      |
//! |------------|-------------------------------------|-----------------------------------|
//! | `software` | bounds-checked buffer views         | everywhere                        |
//! | `native`   | raw pointers, word-at-a-time        | `native` feature, x86_64/aarch64  |
//!
//! Both produce byte-identical blocks and report identical errors, so a
//! caller can never tell from the output which one ran.

pub mod native;
pub mod selector;
pub mod software;

use crate::block::match_finder::HashTable;
use crate::buffer::{BufferView, BufferViewMut};
use crate::config::MAX_INPUT_SIZE;
use crate::error::{Error, Result};

pub use selector::resolve;

/// Block compressor: reads `input` from its cursor to its end, writes at the
/// output cursor, advances both, returns bytes written.
pub type CompressFn =
    fn(&mut BufferView<'_>, &mut BufferViewMut<'_>, &mut HashTable, u32) -> Result<usize>;

/// Block decompressor: same cursor contract as [`CompressFn`], returns bytes
/// produced.
pub type DecompressFn = fn(&mut BufferView<'_>, &mut BufferViewMut<'_>) -> Result<usize>;

/// Which implementation an [`Engine`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// Raw-pointer engine, see [`native`].
    Native,
    /// Portable engine over buffer views, see [`software`].
    Software,
}

impl EngineKind {
    /// Stable lower-case name, as reported by `engine_name()`.
    pub const fn name(self) -> &'static str {
        match self {
            EngineKind::Native => "native",
            EngineKind::Software => "software",
        }
    }
}

impl core::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Function pointers for one engine.
#[derive(Clone, Copy)]
pub struct Engine {
    /// Which implementation these pointers belong to.
    pub kind: EngineKind,
    /// Block compressor.  Acceleration is clamped into its legal range.
    pub compress: CompressFn,
    /// Block decompressor.
    pub decompress: DecompressFn,
    /// Worst-case compressed size for an input length.
    pub max_compressed_size: fn(usize) -> usize,
}

impl Engine {
    /// The portable engine.
    pub fn software() -> Engine {
        software::ENGINE
    }

    /// The native engine, or `None` when this build or host cannot run it.
    pub fn native() -> Option<Engine> {
        native::is_available().then_some(native::ENGINE)
    }

    /// `"native"` or `"software"`.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

impl core::fmt::Debug for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine").field("kind", &self.kind).finish_non_exhaustive()
    }
}

impl PartialEq for Engine {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Engine {}

/// Checks every compressor runs before touching the output: input size, then
/// worst-case output room.
pub(crate) fn check_compress_bounds(input_len: usize, output_room: usize) -> Result<()> {
    if input_len > MAX_INPUT_SIZE {
        return Err(Error::InputTooLarge { len: input_len, max: MAX_INPUT_SIZE });
    }
    let needed = crate::block::types::max_compressed_size(input_len);
    if output_room < needed {
        return Err(Error::OutputTooSmall { needed, available: output_room });
    }
    Ok(())
}
