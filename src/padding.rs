//! PKCS#7 style padding.
//!
//! The padding always consists of `n` bytes of value `n`, with `n` between
//! 1 and the block size. Data that is already block aligned gets a full
//! extra block, so the last byte of padded data always describes the
//! padding.

use log::warn;

use crate::error::{Error, Result};

pub const MAX_BLOCK_SIZE: usize = 255;

pub(crate) fn check_block_size(block_size: usize) -> Result<()> {
    if block_size == 0 || block_size > MAX_BLOCK_SIZE {
        return Err(Error::InvalidBlockSize(block_size));
    }
    Ok(())
}

/// Pad `data` to a multiple of `block_size`.
///
/// # Panics
///
/// Panics if `block_size` is 0 or greater than 255, since the padding
/// length has to fit into a single byte.
pub fn pad(data: &[u8], block_size: usize) -> Vec<u8> {
    assert!(
        (1..=MAX_BLOCK_SIZE).contains(&block_size),
        "block size must be in 1..=255, got {}",
        block_size
    );

    let pad_len = block_size - (data.len() % block_size);
    let mut result = Vec::with_capacity(data.len() + pad_len);
    result.extend_from_slice(data);
    result.resize(data.len() + pad_len, pad_len as u8);
    result
}

/// Strip the padding added by [`pad`].
///
/// Every padding byte is checked, not only the last one. A footer that
/// does not match is reported as [`Error::InvalidPadding`] instead of
/// truncating an arbitrary number of bytes.
pub fn unpad(data: &[u8], block_size: usize) -> Result<Vec<u8>> {
    check_block_size(block_size)?;
    if data.len() % block_size != 0 {
        return Err(Error::InvalidLength {
            length: data.len(),
            block_size,
        });
    }

    let pad_byte = match data.last() {
        Some(&b) => b,
        None => return Err(Error::InvalidPadding),
    };
    let pad_len = pad_byte as usize;
    if pad_len == 0 || pad_len > block_size || pad_len > data.len() {
        warn!("rejecting padding length {} for block size {}", pad_len, block_size);
        return Err(Error::InvalidPadding);
    }

    let content_len = data.len() - pad_len;
    if data[content_len..].iter().any(|&b| b != pad_byte) {
        warn!("padding bytes do not match the padding length {}", pad_len);
        return Err(Error::InvalidPadding);
    }

    Ok(data[..content_len].to_vec())
}
