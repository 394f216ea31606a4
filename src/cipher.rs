//! Block cipher seam
//!
//! The transform only needs a fixed block size and single-block encrypt and
//! decrypt. Anything implementing [`BlockCipher`] can be plugged in; AES from
//! the RustCrypto `aes` crate is provided.

use crate::{Result, SubdomainError};
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256, Block};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A keyed block cipher operating on single blocks in place
///
/// Implementations must be stateless across calls: the same block and key
/// always give the same output.
pub trait BlockCipher {
    /// Block size in bytes
    fn block_size(&self) -> usize;

    /// Encrypt exactly one block in place (`block.len() == block_size()`)
    fn encrypt_block(&self, block: &mut [u8]);

    /// Decrypt exactly one block in place (`block.len() == block_size()`)
    fn decrypt_block(&self, block: &mut [u8]);
}

impl<T: BlockCipher + ?Sized> BlockCipher for Box<T> {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        (**self).encrypt_block(block)
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        (**self).decrypt_block(block)
    }
}

impl<T: BlockCipher + ?Sized> BlockCipher for Arc<T> {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        (**self).encrypt_block(block)
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        (**self).decrypt_block(block)
    }
}

impl<T: BlockCipher + ?Sized> BlockCipher for &T {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        (**self).encrypt_block(block)
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        (**self).decrypt_block(block)
    }
}

/// Boxed cipher usable from any thread
pub type DynBlockCipher = Box<dyn BlockCipher + Send + Sync>;

/// AES block size in bytes
pub const AES_BLOCK_SIZE: usize = 16;

/// AES with the key size picked from the key length (16, 24 or 32 bytes)
#[derive(Clone)]
pub enum AesCipher {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl AesCipher {
    pub fn new(key: &[u8]) -> Result<Self> {
        let cipher = match key.len() {
            16 => Aes128::new_from_slice(key).map(Self::Aes128),
            24 => Aes192::new_from_slice(key).map(Self::Aes192),
            32 => Aes256::new_from_slice(key).map(Self::Aes256),
            n => {
                return Err(SubdomainError::InvalidKey(format!(
                    "AES key must be 16, 24 or 32 bytes, got {}",
                    n
                )))
            }
        };
        cipher.map_err(|e| SubdomainError::InvalidKey(e.to_string()))
    }

    /// Key size in bits
    pub fn key_bits(&self) -> usize {
        match self {
            Self::Aes128(_) => 128,
            Self::Aes192(_) => 192,
            Self::Aes256(_) => 256,
        }
    }
}

impl BlockCipher for AesCipher {
    fn block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        let block = Block::from_mut_slice(block);
        match self {
            Self::Aes128(c) => c.encrypt_block(block),
            Self::Aes192(c) => c.encrypt_block(block),
            Self::Aes256(c) => c.encrypt_block(block),
        }
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        let block = Block::from_mut_slice(block);
        match self {
            Self::Aes128(c) => c.decrypt_block(block),
            Self::Aes192(c) => c.decrypt_block(block),
            Self::Aes256(c) => c.decrypt_block(block),
        }
    }
}

// Never print round keys
impl fmt::Debug for AesCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AesCipher(AES-{})", self.key_bits())
    }
}

/// Cipher algorithm selectable from config and command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CipherKind {
    /// AES-128/192/256, chosen by key length
    #[default]
    Aes,
}

impl CipherKind {
    /// Build a keyed cipher of this kind
    pub fn build(self, key: &[u8]) -> Result<DynBlockCipher> {
        match self {
            CipherKind::Aes => Ok(Box::new(AesCipher::new(key)?)),
        }
    }
}
