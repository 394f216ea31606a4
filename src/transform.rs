//! Block cipher subdomain transform
//!
//! Encode: pad, encrypt each block independently, base-32 encode without
//! padding characters, pack into labels below a copy of the base domain.
//! Decode runs the same steps backwards.

use crate::cipher::{BlockCipher, DynBlockCipher};
use crate::domain_name::{DomainName, MAX_LABEL_LEN};
use crate::{packing, padding, Result, SubdomainError};
use data_encoding::BASE32_NOPAD;

/// Encodes payloads as names below a fixed base domain
///
/// Holds no per-call state, so one instance can serve concurrent callers
/// as long as the cipher can.
#[derive(Debug, Clone)]
pub struct BlockCipherTransform<C = DynBlockCipher> {
    /// Keyed cipher
    cipher: C,

    /// Suffix of every generated name (e.g. "test.com")
    base: DomainName,
}

impl<C: BlockCipher> BlockCipherTransform<C> {
    pub fn new(base: DomainName, cipher: C) -> Self {
        Self { cipher, base }
    }

    pub fn base_domain(&self) -> &DomainName {
        &self.base
    }

    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    /// Block size of the configured cipher, validated
    pub fn block_size(&self) -> Result<usize> {
        let block_size = self.cipher.block_size();
        if block_size == 0 || block_size > MAX_LABEL_LEN {
            return Err(SubdomainError::ConfigurationError(format!(
                "block size must be between 1 and {} bytes, got {}",
                MAX_LABEL_LEN, block_size
            )));
        }
        Ok(block_size)
    }

    /// Largest payload that [`encode`](Self::encode) packs into one name
    ///
    /// Zero when the cipher is unusable or the base domain leaves no room.
    pub fn max_payload_bytes(&self) -> usize {
        match self.block_size() {
            Ok(block_size) => packing::max_payload_bytes(self.base.len(), block_size),
            Err(_) => 0,
        }
    }

    /// Encode `plaintext` into a full domain name ending in the base domain
    pub fn encode(&self, plaintext: &[u8]) -> Result<String> {
        let block_size = self.block_size()?;

        let max = packing::max_payload_bytes(self.base.len(), block_size);
        if plaintext.len() > max {
            return Err(SubdomainError::PayloadTooLarge {
                len: plaintext.len(),
                max,
            });
        }

        let ciphertext = self.encrypt_blocks(plaintext, block_size);
        let text = encode_base32(&ciphertext)?;

        let plan = packing::plan_labels(text.len(), self.base.len(), block_size)
            .ok_or(SubdomainError::PayloadTooLarge {
                len: plaintext.len(),
                max,
            })?;

        // Labels are added leaf-ward, so the last chunk goes in first and
        // the text reads left to right in the rendered name
        let mut name = self.base.copy();
        for label in packing::split_labels(&text, &plan).into_iter().rev() {
            name.add_label(label)?;
        }

        Ok(name.to_string())
    }

    /// Pad and encrypt without the text encoding step
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let block_size = self.block_size()?;
        Ok(self.encrypt_blocks(plaintext, block_size))
    }

    /// Decode a name produced by [`encode`](Self::encode) back to the payload
    pub fn decode(&self, name: &str) -> Result<Vec<u8>> {
        let text = self.payload_text(name)?;
        let block_size = self.block_size()?;

        let ciphertext = BASE32_NOPAD
            .decode(text.as_bytes())
            .map_err(|e| SubdomainError::DecodingError(e.to_string()))?;

        self.decrypt_blocks(ciphertext, block_size)
    }

    /// Decrypt and unpad raw ciphertext
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let block_size = self.block_size()?;
        self.decrypt_blocks(ciphertext.to_vec(), block_size)
    }

    fn encrypt_blocks(&self, plaintext: &[u8], block_size: usize) -> Vec<u8> {
        let mut buf = padding::pad(plaintext, block_size);
        for block in buf.chunks_exact_mut(block_size) {
            self.cipher.encrypt_block(block);
        }
        buf
    }

    fn decrypt_blocks(&self, mut buf: Vec<u8>, block_size: usize) -> Result<Vec<u8>> {
        if buf.len() % block_size != 0 {
            return Err(SubdomainError::ConfigurationError(format!(
                "ciphertext length {} is not a multiple of block size {}",
                buf.len(),
                block_size
            )));
        }

        for block in buf.chunks_exact_mut(block_size) {
            self.cipher.decrypt_block(block);
        }

        padding::unpad(&mut buf, block_size)?;
        Ok(buf)
    }

    /// Strip the base domain and join the payload labels
    ///
    /// The suffix match is ASCII case-insensitive and a trailing root `.` is
    /// accepted; resolvers are free to change letter case.
    fn payload_text(&self, name: &str) -> Result<String> {
        let mismatch = || SubdomainError::DomainMismatchError {
            name: name.to_string(),
            expected: self.base.to_string(),
        };

        let full = name.strip_suffix('.').unwrap_or(name);
        let prefix = if self.base.is_empty() {
            full
        } else {
            let base = self.base.to_string();
            let bytes = full.as_bytes();
            if bytes.len() <= base.len() {
                return Err(mismatch());
            }

            let split = bytes.len() - base.len();
            if bytes[split - 1] != b'.' || !bytes[split..].eq_ignore_ascii_case(base.as_bytes()) {
                return Err(mismatch());
            }
            &full[..split - 1]
        };

        if prefix.is_empty() {
            return Err(SubdomainError::DecodingError(
                "no payload labels before the base domain".to_string(),
            ));
        }

        let mut text = String::with_capacity(prefix.len());
        for label in prefix.split('.') {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return Err(SubdomainError::InvalidLabel(label.to_string()));
            }
            text.push_str(&label.to_ascii_uppercase());
        }
        Ok(text)
    }
}

/// Base-32 encode into an exactly sized buffer
fn encode_base32(data: &[u8]) -> Result<String> {
    let mut out = vec![0u8; packing::encoded_len(data.len())];
    BASE32_NOPAD.encode_mut(data, &mut out);
    String::from_utf8(out).map_err(|e| SubdomainError::EncodingError(e.to_string()))
}
