// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::HashFsError;
use crate::hasher::{HashAlgorithm, HashLocation};

/// One year, the default `max-age` for hashed responses
pub const DEFAULT_MAX_AGE_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Hashing options, fixed when a [`HashFs`](crate::fs::HashFs) is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashFsConfig {
    /// Digest algorithm (default: sha256)
    #[serde(default)]
    pub algorithm: HashAlgorithm,

    /// Where the hash goes in the filename (default: end)
    #[serde(default)]
    pub location: HashLocation,

    /// Truncate the hex hash to this many characters.
    /// 0, or anything at least the digest length, keeps the full hash.
    #[serde(default)]
    pub hash_length: usize,

    /// `max-age` advertised for hashed responses (default: one year).
    /// Values <= 0 fall back to the default.
    #[serde(default = "default_max_age_seconds")]
    pub max_age_seconds: i64,

    /// On a reverse lookup miss, try to parse a hash out of the requested
    /// name and accept it only if it matches the recomputed content hash.
    #[serde(default)]
    pub verify_unknown_hashed_paths: bool,
}

fn default_max_age_seconds() -> i64 {
    DEFAULT_MAX_AGE_SECONDS
}

impl Default for HashFsConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            location: HashLocation::default(),
            hash_length: 0,
            max_age_seconds: default_max_age_seconds(),
            verify_unknown_hashed_paths: false,
        }
    }
}

impl HashFsConfig {
    /// Cache lifetime with invalid values replaced by the default
    pub fn max_age(&self) -> Duration {
        if self.max_age_seconds <= 0 {
            Duration::from_secs(DEFAULT_MAX_AGE_SECONDS as u64)
        } else {
            Duration::from_secs(self.max_age_seconds as u64)
        }
    }

    /// Number of hex characters the produced hashes will have
    pub fn effective_hash_len(&self) -> usize {
        let full = self.algorithm.hex_len();
        if self.hash_length == 0 || self.hash_length >= full {
            full
        } else {
            self.hash_length
        }
    }

    /// Copy of this config with `max_age_seconds` normalized
    pub fn normalize(&self) -> HashFsConfig {
        let mut normalized = self.clone();
        normalized.max_age_seconds = self.max_age().as_secs() as i64;
        normalized
    }
}

/// Top-level configuration for the `hashfs` binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub assets: AssetsConfig,
    #[serde(default)]
    pub hashing: HashFsConfig,
    /// Paths to hash before the server starts accepting requests
    #[serde(default)]
    pub warm: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// URL prefix the assets are served under, e.g. `/static/`
    #[serde(default = "default_mount_prefix")]
    pub mount_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            mount_prefix: default_mount_prefix(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_mount_prefix() -> String {
    "/static/".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory the assets are read from
    pub root: PathBuf,
}

/// Surface bad algorithm or location names as their own error variants
/// rather than as generic deserialization failures.
fn check_hashing_tags(value: &serde_yaml::Value) -> Result<(), HashFsError> {
    let Some(hashing) = value.get("hashing") else {
        return Ok(());
    };
    if let Some(tag) = hashing.get("algorithm").and_then(|v| v.as_str()) {
        HashAlgorithm::parse_algorithm(tag)?;
    }
    if let Some(tag) = hashing.get("location").and_then(|v| v.as_str()) {
        HashLocation::parse_location(tag)?;
    }
    Ok(())
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, HashFsError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| HashFsError::Config(e.to_string()))?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                HashFsError::Config(format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                ))
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        let value: serde_yaml::Value =
            serde_yaml::from_str(&substituted).map_err(|e| HashFsError::Config(e.to_string()))?;
        check_hashing_tags(&value)?;
        serde_yaml::from_value(value).map_err(|e| HashFsError::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HashFsError> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| HashFsError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), HashFsError> {
        if self.server.port == 0 {
            return Err(HashFsError::Config("server.port must be non-zero".to_string()));
        }

        let prefix = &self.server.mount_prefix;
        if !prefix.starts_with('/') || !prefix.ends_with('/') {
            return Err(HashFsError::Config(format!(
                "server.mount_prefix '{}' must start and end with '/'",
                prefix
            )));
        }

        if self.assets.root.as_os_str().is_empty() {
            return Err(HashFsError::Config("assets.root cannot be empty".to_string()));
        }

        Ok(())
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.address, self.server.port)
    }
}
