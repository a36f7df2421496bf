//! Error types shared by the padding codec, the ECB driver and the key sources.

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The padding footer is malformed, i.e. the data was corrupted,
    /// tampered with or decrypted under the wrong key.
    #[error("invalid padding")]
    InvalidPadding,

    /// The input is not a whole number of blocks.
    #[error("input length {length} is not a multiple of the block size {block_size}")]
    InvalidLength { length: usize, block_size: usize },

    #[error("invalid key: expected {expected} bytes, got {actual}")]
    InvalidKey { expected: usize, actual: usize },

    #[error("invalid block size {0} (must be between 1 and 255)")]
    InvalidBlockSize(usize),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
