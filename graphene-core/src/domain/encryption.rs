//! Key management domain models

use serde::{Deserialize, Serialize};

/// Default Argon2id parameters
pub const DEFAULT_TIME_COST: u32 = 3;
pub const DEFAULT_MEMORY_COST: u32 = 65536; // 64 MiB
pub const DEFAULT_PARALLELISM: u32 = 4;
pub const DEFAULT_HASH_LEN: u32 = 32;

/// Argon2id parameters for passphrase key derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Params {
    pub time_cost: u32,
    pub memory_cost: u32,
    pub parallelism: u32,
    pub hash_len: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            time_cost: DEFAULT_TIME_COST,
            memory_cost: DEFAULT_MEMORY_COST,
            parallelism: DEFAULT_PARALLELISM,
            hash_len: DEFAULT_HASH_LEN,
        }
    }
}

/// Key derivation metadata stored in encryption.json
///
/// Holds only the public parameters (salt, Argon2 settings). The derived
/// key itself is never persisted; losing both the passphrase and the
/// environment key makes previously encrypted fields unrecoverable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyMetadata {
    /// Base64-encoded random salt
    pub salt: String,
    pub algorithm: String,
    pub version: u32,
    pub argon2_params: Argon2Params,
}

impl KeyMetadata {
    pub fn new(salt: String) -> Self {
        Self {
            salt,
            algorithm: "argon2id".to_string(),
            version: 1,
            argon2_params: Argon2Params::default(),
        }
    }
}

/// Where the process-lifetime master key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySource {
    /// GRAPHENE_SECRET_KEY environment variable
    Environment,
    /// Derived from GRAPHENE_PASSPHRASE with Argon2id
    Passphrase,
    /// secret.key file in the graphene directory
    KeyFile,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Environment => "environment",
            KeySource::Passphrase => "passphrase",
            KeySource::KeyFile => "key file",
        }
    }
}
