//! LZ4 block format: constants, match finding, and the token-stream
//! encoder/decoder used by the software engine.
//!
//! The native engine (see [`crate::engine::native`]) reimplements the same
//! algorithms over raw pointers and shares only [`types`] with this module.

pub mod decoder;
pub mod encoder;
pub mod match_finder;
pub mod token;
pub mod types;

pub use decoder::decode_block;
pub use encoder::{encode_block, BlockEncoder};
pub use match_finder::{HashTable, Match, MatchFinder};
pub use token::{Token, Tokens};
pub use types::{
    max_compressed_size, LAST_LITERALS, MAX_OFFSET, MF_LIMIT, MIN_INPUT_FOR_MATCH, MIN_MATCH,
};
