//! Swappable subdomain encoding strategies

use crate::cipher::BlockCipher;
use crate::transform::BlockCipherTransform;
use crate::Result;
use std::sync::Arc;

/// A reversible bytes <-> domain name encoding
///
/// Callers that stream data (see [`crate::pipeline`]) only depend on this
/// trait, so a different strategy can replace the block cipher transform.
pub trait SubdomainEncoder {
    /// Encode one payload into one domain name
    fn encode(&self, src: &[u8]) -> Result<String>;

    /// Recover the payload from a name produced by `encode`
    fn decode(&self, src: &str) -> Result<Vec<u8>>;

    /// Largest payload `encode` accepts
    fn max_payload_bytes(&self) -> usize;
}

impl<C: BlockCipher> SubdomainEncoder for BlockCipherTransform<C> {
    fn encode(&self, src: &[u8]) -> Result<String> {
        BlockCipherTransform::encode(self, src)
    }

    fn decode(&self, src: &str) -> Result<Vec<u8>> {
        BlockCipherTransform::decode(self, src)
    }

    fn max_payload_bytes(&self) -> usize {
        BlockCipherTransform::max_payload_bytes(self)
    }
}

impl<E: SubdomainEncoder + ?Sized> SubdomainEncoder for Arc<E> {
    fn encode(&self, src: &[u8]) -> Result<String> {
        (**self).encode(src)
    }

    fn decode(&self, src: &str) -> Result<Vec<u8>> {
        (**self).decode(src)
    }

    fn max_payload_bytes(&self) -> usize {
        (**self).max_payload_bytes()
    }
}
