/// Hash algorithm definitions and digest computation
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::fmt;
use std::str::FromStr;

use crate::error::HashFsError;

/// Supported content hash algorithms
///
/// The set is closed: anything else is rejected when parsed, so a typo in
/// configuration stops startup instead of producing unexpected filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum HashAlgorithm {
    /// SHA-256 (FIPS 180-4), 64 hex chars
    #[default]
    Sha256,
    /// SHA-384 (FIPS 180-4), 96 hex chars
    Sha384,
    /// SHA-512 (FIPS 180-4), 128 hex chars
    Sha512,
    /// MD5, 32 hex chars. Matches the ETag format S3 uses for simple uploads.
    Md5,
}

impl HashAlgorithm {
    /// Canonical lowercase name, as used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Md5 => "md5",
        }
    }

    /// Length in bytes of the raw digest
    pub fn digest_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
            HashAlgorithm::Md5 => 16,
        }
    }

    /// Length of the hex-encoded digest
    pub fn hex_len(&self) -> usize {
        self.digest_len() * 2
    }

    /// Compute the raw digest of `content`
    pub fn digest(&self, content: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha256 => Sha256::digest(content).to_vec(),
            HashAlgorithm::Sha384 => Sha384::digest(content).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(content).to_vec(),
            HashAlgorithm::Md5 => md5::compute(content).0.to_vec(),
        }
    }

    /// Parse algorithm from string (case-insensitive, dashes ignored)
    pub fn parse_algorithm(s: &str) -> Result<Self, HashFsError> {
        match s.trim().to_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            "md5" => Ok(HashAlgorithm::Md5),
            _ => Err(HashFsError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashFsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_algorithm(s)
    }
}

impl TryFrom<String> for HashAlgorithm {
    type Error = HashFsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse_algorithm(&s)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
