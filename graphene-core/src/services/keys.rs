//! Key service - master key resolution
//!
//! Resolves the single symmetric key used for field encryption, once per
//! process. Sources, in priority order:
//!
//! 1. GRAPHENE_SECRET_KEY - base64-encoded 32-byte key, supplied externally
//! 2. GRAPHENE_PASSPHRASE - key derived with Argon2id; salt and parameters
//!    live in encryption.json next to the database (created on first use)
//! 3. secret.key - generated once at first startup and reused thereafter
//!
//! The key is never logged and never persisted outside these files. Losing
//! it makes all previously encrypted fields permanently unrecoverable; that
//! is a deliberate, disclosed property.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use rand::RngCore;

use crate::domain::result::{Error, Result};
use crate::domain::{Argon2Params, KeyMetadata, KeySource};

/// Resolved key material plus where it came from
pub struct KeyMaterial {
    bytes: [u8; 32],
    source: KeySource,
}

impl KeyMaterial {
    pub fn bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    pub fn source(&self) -> KeySource {
        self.source
    }
}

// Redact the key from debug output
impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Service resolving the process-lifetime master key
pub struct KeyService {
    graphene_dir: PathBuf,
}

impl KeyService {
    pub fn new(graphene_dir: &Path) -> Self {
        Self {
            graphene_dir: graphene_dir.to_path_buf(),
        }
    }

    fn key_file(&self) -> PathBuf {
        self.graphene_dir.join("secret.key")
    }

    fn metadata_file(&self) -> PathBuf {
        self.graphene_dir.join("encryption.json")
    }

    /// Resolve the master key per the priority order above
    pub fn load(&self) -> Result<KeyMaterial> {
        if let Ok(encoded) = std::env::var("GRAPHENE_SECRET_KEY") {
            return Ok(KeyMaterial {
                bytes: decode_key(&encoded)?,
                source: KeySource::Environment,
            });
        }

        if let Ok(passphrase) = std::env::var("GRAPHENE_PASSPHRASE") {
            return Ok(KeyMaterial {
                bytes: self.derive_from_passphrase(&passphrase)?,
                source: KeySource::Passphrase,
            });
        }

        Ok(KeyMaterial {
            bytes: self.load_or_generate_key_file()?,
            source: KeySource::KeyFile,
        })
    }

    /// Derive the key from a passphrase using Argon2id.
    ///
    /// Salt and parameters are read from encryption.json, created with a
    /// fresh random salt on first use so the derivation is stable across
    /// restarts.
    pub fn derive_from_passphrase(&self, passphrase: &str) -> Result<[u8; 32]> {
        let metadata = self.load_or_create_metadata()?;
        let salt = base64::engine::general_purpose::STANDARD
            .decode(&metadata.salt)
            .map_err(|_| Error::encryption("invalid salt in key metadata"))?;
        derive_key(passphrase, &salt, &metadata.argon2_params)
    }

    fn load_or_create_metadata(&self) -> Result<KeyMetadata> {
        let path = self.metadata_file();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            return Ok(serde_json::from_str(&content)?);
        }

        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let metadata =
            KeyMetadata::new(base64::engine::general_purpose::STANDARD.encode(salt));
        fs::write(&path, serde_json::to_string_pretty(&metadata)?)?;
        Ok(metadata)
    }

    /// Load the generated key file, creating it on first startup
    pub fn load_or_generate_key_file(&self) -> Result<[u8; 32]> {
        let path = self.key_file();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            return decode_key(content.trim());
        }

        let mut key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);
        fs::write(&path, base64::engine::general_purpose::STANDARD.encode(key))?;

        // Key files should not be world-readable
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&path, fs::Permissions::from_mode(0o600));
        }

        Ok(key)
    }
}

/// Decode a base64 key, enforcing the 32-byte length
fn decode_key(encoded: &str) -> Result<[u8; 32]> {
    let raw = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| Error::encryption("key is not valid base64"))?;
    if raw.len() != 32 {
        return Err(Error::encryption(format!(
            "key must be 32 bytes, got {}",
            raw.len()
        )));
    }
    let mut key = [0u8; 32];
    key.copy_from_slice(&raw);
    Ok(key)
}

/// Derive a key from a passphrase using Argon2id
fn derive_key(passphrase: &str, salt: &[u8], params: &Argon2Params) -> Result<[u8; 32]> {
    let argon2_params = argon2::Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(params.hash_len as usize),
    )
    .map_err(|e| Error::encryption(format!("invalid argon2 params: {:?}", e)))?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let mut key = [0u8; 32];
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key)
        .map_err(|e| Error::encryption(format!("key derivation failed: {:?}", e)))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_decode_key_rejects_bad_input() {
        assert!(decode_key("!!! not base64").is_err());
        // Valid base64 but wrong length
        let short = base64::engine::general_purpose::STANDARD.encode([0u8; 16]);
        assert!(decode_key(&short).is_err());
    }

    #[test]
    fn test_decode_key_round_trip() {
        let key = [9u8; 32];
        let encoded = base64::engine::general_purpose::STANDARD.encode(key);
        assert_eq!(decode_key(&encoded).unwrap(), key);
    }

    #[test]
    fn test_key_file_generated_once() {
        let dir = tempdir().unwrap();
        let service = KeyService::new(dir.path());

        let first = service.load_or_generate_key_file().unwrap();
        let second = service.load_or_generate_key_file().unwrap();
        assert_eq!(first, second);
        assert!(dir.path().join("secret.key").exists());
    }

    #[test]
    fn test_passphrase_derivation_is_stable() {
        let dir = tempdir().unwrap();
        let service = KeyService::new(dir.path());

        let first = service.derive_from_passphrase("correct horse").unwrap();
        let second = service.derive_from_passphrase("correct horse").unwrap();
        assert_eq!(first, second);

        let other = service.derive_from_passphrase("wrong horse").unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn test_metadata_file_created() {
        let dir = tempdir().unwrap();
        let service = KeyService::new(dir.path());
        service.derive_from_passphrase("pw").unwrap();

        let content = fs::read_to_string(dir.path().join("encryption.json")).unwrap();
        let metadata: KeyMetadata = serde_json::from_str(&content).unwrap();
        assert_eq!(metadata.algorithm, "argon2id");
    }

    #[test]
    fn test_debug_redacts_key() {
        let material = KeyMaterial {
            bytes: [1u8; 32],
            source: KeySource::KeyFile,
        };
        let debug = format!("{:?}", material);
        assert!(!debug.contains("1, 1, 1"));
    }
}
