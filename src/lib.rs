//! Subdomain Encoding: carry arbitrary bytes inside valid DNS names
//!
//! A payload is padded, encrypted block by block with a symmetric block
//! cipher, written in the DNS-safe base-32 alphabet and packed into labels
//! below a fixed base domain, respecting the RFC 1035 limits (63 characters
//! per label, 253 per name). Decoding reverses each step.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use subdomain_encoding::{AesCipher, BlockCipherTransform, DomainName};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let base = DomainName::parse("test.com")?;
//!     let cipher = AesCipher::new(b"change this password to a secret")?;
//!     let transform = BlockCipherTransform::new(base, cipher);
//!
//!     let name = transform.encode(b"Hello World!")?;
//!     println!("{}", name); // <26 base-32 characters>.test.com
//!
//!     assert_eq!(transform.decode(&name)?, b"Hello World!");
//!     Ok(())
//! }
//! ```
//!
//! ## Layout
//!
//! ```text
//!  plaintext ──pad──▶ blocks ──encrypt──▶ ciphertext ──base32──▶ text
//!                                                                 │
//!                                   <label>.<label>.test.com ◀────┘ pack
//! ```
//!
//! There is no integrity tag: a corrupted name may decode to garbage rather
//! than fail.

pub mod cipher;
pub mod config;
pub mod domain_name;
pub mod encoder;
pub mod packing;
pub mod padding;
pub mod pipeline;
pub mod transform;

// Re-export core types
pub use cipher::{AesCipher, BlockCipher, CipherKind, DynBlockCipher};
pub use config::{EncoderConfig, KeyFormat};
pub use domain_name::{DomainName, MAX_DOMAIN_NAME_LEN, MAX_LABEL_LEN};
pub use encoder::SubdomainEncoder;
pub use transform::BlockCipherTransform;

/// Subdomain encoding error types
#[derive(Debug, thiserror::Error)]
pub enum SubdomainError {
    /// Label empty or longer than 63 characters
    #[error("invalid label `{0}`")]
    InvalidLabel(String),

    /// Name would be longer than 253 characters
    #[error("invalid domain name `{name}`: {len} characters (max: 253)")]
    InvalidDomainName { name: String, len: usize },

    /// Unusable block size, or ciphertext not a whole number of blocks
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Name does not end with the configured base domain
    #[error("domain `{name}` does not end with `{expected}`")]
    DomainMismatchError { name: String, expected: String },

    /// Malformed base-32 text
    #[error("Decoding error: {0}")]
    DecodingError(String),

    /// Padding bytes inconsistent after decryption
    #[error("Padding error: {0}")]
    PaddingError(String),

    /// Internal failure while building the encoded text
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Payload does not fit one domain name
    #[error("Payload too large: {len} bytes (max: {max})")]
    PayloadTooLarge { len: usize, max: usize },

    /// Key material rejected by the cipher
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SubdomainError>;
