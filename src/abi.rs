//! C-ABI shims over the codec facade.
//!
//! Enabled with:
//!   cargo build --release --features c-abi
//!
//! The produced `target/release/liblzblock.a` exports four symbols for C
//! harnesses.  Sizes are `size_t`; results follow the usual C conventions of
//! block codecs: compression returns 0 on failure, decompression a negative
//! code.

use std::slice;

use libc::{c_char, c_int, size_t};

use crate::error::Error;

/// Decompression failed because the block is malformed.
pub const LZBLOCK_ERROR_CORRUPT: c_int = -1;
/// Decompression failed because the destination is too small.
pub const LZBLOCK_ERROR_OUTPUT_TOO_SMALL: c_int = -2;
/// Null pointer, or a size that does not fit the return type.
pub const LZBLOCK_ERROR_ARGUMENT: c_int = -3;

// ─── helpers ─────────────────────────────────────────────────────────────────

#[inline(always)]
fn error_code(err: &Error) -> c_int {
    match err {
        Error::OutputTooSmall { .. } => LZBLOCK_ERROR_OUTPUT_TOO_SMALL,
        Error::CorruptInput { .. } => LZBLOCK_ERROR_CORRUPT,
        Error::Bounds(_) | Error::InputTooLarge { .. } => LZBLOCK_ERROR_ARGUMENT,
    }
}

/// Borrow a C buffer, accepting a null pointer only for zero-length input.
///
/// # Safety
/// A non-null `ptr` must be valid for reads of `len` bytes.
unsafe fn borrow<'a>(ptr: *const c_char, len: size_t) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return (len == 0).then_some(&[][..]);
    }
    Some(slice::from_raw_parts(ptr as *const u8, len))
}

// ─────────────────────────────────────────────────────────────────────────────
// size_t lzblock_compress(const char *src, size_t src_size,
//                         char *dst, size_t dst_capacity);
//
// Returns bytes written to dst, or 0 on failure.  Empty input also yields 0.
// ─────────────────────────────────────────────────────────────────────────────
/// # Safety
/// `src` readable for `src_size` bytes, `dst` writable for `dst_capacity`
/// bytes, and the two regions do not overlap.
#[no_mangle]
pub unsafe extern "C" fn lzblock_compress(
    src: *const c_char,
    src_size: size_t,
    dst: *mut c_char,
    dst_capacity: size_t,
) -> size_t {
    let Some(input) = borrow(src, src_size) else {
        return 0;
    };
    if dst.is_null() {
        return 0;
    }
    let output = slice::from_raw_parts_mut(dst as *mut u8, dst_capacity);
    crate::compress(input, output).unwrap_or(0)
}

// ─────────────────────────────────────────────────────────────────────────────
// int lzblock_decompress(const char *src, size_t src_size,
//                        char *dst, size_t dst_capacity);
//
// Returns bytes written to dst, or a negative LZBLOCK_ERROR_* code.
// ─────────────────────────────────────────────────────────────────────────────
/// # Safety
/// `src` readable for `src_size` bytes, `dst` writable for `dst_capacity`
/// bytes, and the two regions do not overlap.
#[no_mangle]
pub unsafe extern "C" fn lzblock_decompress(
    src: *const c_char,
    src_size: size_t,
    dst: *mut c_char,
    dst_capacity: size_t,
) -> c_int {
    let Some(input) = borrow(src, src_size) else {
        return LZBLOCK_ERROR_ARGUMENT;
    };
    let output: &mut [u8] = if dst.is_null() {
        if dst_capacity != 0 {
            return LZBLOCK_ERROR_ARGUMENT;
        }
        &mut []
    } else {
        slice::from_raw_parts_mut(dst as *mut u8, dst_capacity)
    };
    match crate::decompress(input, output) {
        Ok(n) => c_int::try_from(n).unwrap_or(LZBLOCK_ERROR_ARGUMENT),
        Err(err) => error_code(&err),
    }
}

/// `size_t lzblock_max_compressed_size(size_t input_size);`
#[no_mangle]
pub extern "C" fn lzblock_max_compressed_size(input_size: size_t) -> size_t {
    crate::max_compressed_size(input_size)
}

/// `const char *lzblock_engine_name(void);`: static and NUL-terminated.
#[no_mangle]
pub extern "C" fn lzblock_engine_name() -> *const c_char {
    let name: &'static [u8] = match crate::engine::resolve().kind {
        crate::EngineKind::Native => b"native\0",
        crate::EngineKind::Software => b"software\0",
    };
    name.as_ptr() as *const c_char
}
