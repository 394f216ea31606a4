//! Block padding
//!
//! Pads with `N` bytes of value `N`, `N` in `1..=block_size`. Input that is
//! already block aligned gets a whole extra block, so stripping never has to
//! guess.

use crate::{Result, SubdomainError};

/// Return `data` padded to a multiple of `block_size`
///
/// `block_size` must be in `1..=255`; callers validate it first.
pub fn pad(data: &[u8], block_size: usize) -> Vec<u8> {
    let pad_len = block_size - data.len() % block_size;
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);
    padded
}

/// Length of `data_len` bytes once padded
pub fn padded_len(data_len: usize, block_size: usize) -> usize {
    (data_len / block_size + 1) * block_size
}

/// Strip the padding added by [`pad`] in place
pub fn unpad(data: &mut Vec<u8>, block_size: usize) -> Result<()> {
    let pad_len = match data.last() {
        Some(&n) => n as usize,
        None => return Err(SubdomainError::PaddingError("empty input".to_string())),
    };

    if pad_len == 0 || pad_len > block_size || pad_len > data.len() {
        return Err(SubdomainError::PaddingError(format!(
            "invalid padding length {} for block size {}",
            pad_len, block_size
        )));
    }

    let start = data.len() - pad_len;
    if data[start..].iter().any(|&b| b as usize != pad_len) {
        return Err(SubdomainError::PaddingError(
            "inconsistent padding bytes".to_string(),
        ));
    }

    data.truncate(start);
    Ok(())
}
