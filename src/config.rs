//! Encoder configuration

use crate::cipher::CipherKind;
use crate::domain_name::DomainName;
use crate::transform::BlockCipherTransform;
use crate::{Result, SubdomainError};
use serde::{Deserialize, Serialize};

/// Main encoder configuration
///
/// ```toml
/// domain = "test.com"
/// key = "change this password to a secret"
/// key_format = "utf8"
/// cipher = "aes"
/// concurrency = 4
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Base domain every generated name ends with
    pub domain: String,

    /// Symmetric key, interpreted per `key_format`
    pub key: String,

    /// How `key` is written
    #[serde(default)]
    pub key_format: KeyFormat,

    /// Block cipher algorithm
    #[serde(default)]
    pub cipher: CipherKind,

    /// Max chunks encoded at once by the streaming layer
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    4
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            key: String::new(),
            key_format: KeyFormat::default(),
            cipher: CipherKind::default(),
            concurrency: default_concurrency(),
        }
    }
}

/// Key text encodings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KeyFormat {
    /// Key bytes are the UTF-8 text itself
    #[default]
    Utf8,
    /// Key is hex encoded
    Hex,
}

impl EncoderConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.domain.trim().is_empty() {
            return Err("Base domain must be set".to_string());
        }

        if self.key.is_empty() {
            return Err("Encryption key must be set".to_string());
        }

        if self.concurrency == 0 {
            return Err("Concurrency must be at least 1".to_string());
        }

        Ok(())
    }

    /// Raw key bytes
    pub fn key_bytes(&self) -> Result<Vec<u8>> {
        match self.key_format {
            KeyFormat::Utf8 => Ok(self.key.as_bytes().to_vec()),
            KeyFormat::Hex => hex::decode(self.key.trim())
                .map_err(|e| SubdomainError::InvalidKey(format!("bad hex key: {}", e))),
        }
    }

    /// Parse the domain, key the cipher and build the transform
    pub fn build_transform(&self) -> Result<BlockCipherTransform> {
        let base = DomainName::parse(self.domain.trim())?;
        let cipher = self.cipher.build(&self.key_bytes()?)?;
        Ok(BlockCipherTransform::new(base, cipher))
    }
}
