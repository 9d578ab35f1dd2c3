//! Field-level encryption codec
//!
//! An explicit codec layer invoked at the store's read/write boundary: a
//! pair of functions (`encrypt_field`, `decrypt_field`) rather than
//! encryption hidden inside a column type. Each encryption uses a fresh
//! random nonce, so ciphertexts are non-deterministic; equality lookup on
//! the unique identifier instead goes through `lookup_hash`, a keyed
//! HMAC-SHA-256 blind index under a key derived from the master key.

use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, KeyInit, Nonce};
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::result::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// AES-GCM nonce length in bytes
const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes
const TAG_LEN: usize = 16;

/// Domain-separation label for deriving the blind-index key
const LOOKUP_KEY_CONTEXT: &[u8] = b"graphene.lookup.v1";

/// Field cipher holding the process-lifetime key material.
///
/// The master key encrypts fields directly; the blind-index key is derived
/// from it so a single configured secret covers both concerns. Neither key
/// is ever logged or persisted by this type.
pub struct FieldCipher {
    cipher: Aes256Gcm,
    index_key: [u8; 32],
}

impl FieldCipher {
    /// Build a cipher from a 32-byte master key
    pub fn new(master_key: &[u8; 32]) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(master_key));

        // HMAC accepts keys of any length, so this cannot fail
        let mut mac = <HmacSha256 as Mac>::new_from_slice(master_key)
            .expect("HMAC accepts keys of any length");
        mac.update(LOOKUP_KEY_CONTEXT);
        let mut index_key = [0u8; 32];
        index_key.copy_from_slice(&mac.finalize().into_bytes());

        Self { cipher, index_key }
    }

    /// Encrypt a field value for storage.
    ///
    /// Returns base64(nonce || ciphertext || tag). A fresh nonce is drawn
    /// per call, so encrypting the same plaintext twice yields different
    /// ciphertexts.
    pub fn encrypt_field(&self, plaintext: &str) -> Result<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| Error::encryption("AES-GCM encryption failed"))?;

        let mut raw = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&ciphertext);
        Ok(base64::engine::general_purpose::STANDARD.encode(raw))
    }

    /// Decrypt a stored field value.
    ///
    /// Fails with a decryption error if the value is malformed, was produced
    /// under a different key, or has been tampered with (authentication tag
    /// mismatch). Never returns incorrect plaintext silently.
    pub fn decrypt_field(&self, ciphertext: &str) -> Result<String> {
        let raw = base64::engine::general_purpose::STANDARD
            .decode(ciphertext)
            .map_err(|_| Error::decryption("ciphertext is not valid base64"))?;

        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(Error::decryption("ciphertext too short"));
        }

        let (nonce, body) = raw.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), body)
            .map_err(|_| Error::decryption("authentication failed"))?;

        String::from_utf8(plaintext).map_err(|_| Error::decryption("plaintext is not valid UTF-8"))
    }

    /// Keyed blind index for equality lookup on an encrypted field.
    ///
    /// Deterministic per key, leaks only equality. Stored in the clear with
    /// a uniqueness constraint; the human-meaningful value stays encrypted.
    pub fn lookup_hash(&self, value: &str) -> String {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.index_key)
            .expect("HMAC accepts keys of any length");
        mac.update(value.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    fn cipher() -> FieldCipher {
        FieldCipher::new(&[7u8; 32])
    }

    #[test]
    fn test_round_trip() {
        let c = cipher();
        for plaintext in ["12345", "", "привет мир", "日本語テキスト", "a\nb\tc"] {
            let ct = c.encrypt_field(plaintext).unwrap();
            assert_eq!(c.decrypt_field(&ct).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_round_trip_large_input() {
        let c = cipher();
        let plaintext = "x".repeat(8192);
        let ct = c.encrypt_field(&plaintext).unwrap();
        assert_eq!(c.decrypt_field(&ct).unwrap(), plaintext);
    }

    #[test]
    fn test_nonces_are_random() {
        let c = cipher();
        let a = c.encrypt_field("same input").unwrap();
        let b = c.encrypt_field("same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_tamper_detection() {
        let c = cipher();
        let ct = c.encrypt_field("sensitive value").unwrap();
        let raw = base64::engine::general_purpose::STANDARD.decode(&ct).unwrap();

        // Flip one byte at every position: nonce, body, and tag
        for i in 0..raw.len() {
            let mut tampered = raw.clone();
            tampered[i] ^= 0x01;
            let tampered_b64 = base64::engine::general_purpose::STANDARD.encode(&tampered);
            let err = c.decrypt_field(&tampered_b64).unwrap_err();
            assert!(
                matches!(err, crate::domain::result::Error::Decryption(_)),
                "byte {} flip should fail decryption",
                i
            );
        }
    }

    #[test]
    fn test_wrong_key_fails() {
        let ct = cipher().encrypt_field("12345").unwrap();
        let other = FieldCipher::new(&[8u8; 32]);
        assert!(other.decrypt_field(&ct).is_err());
    }

    #[test]
    fn test_malformed_ciphertext() {
        let c = cipher();
        assert!(c.decrypt_field("not base64 !!!").is_err());
        assert!(c.decrypt_field("").is_err());
        // Valid base64 but too short to hold nonce + tag
        let short = base64::engine::general_purpose::STANDARD.encode([0u8; 8]);
        assert!(c.decrypt_field(&short).is_err());
    }

    #[test]
    fn test_lookup_hash_deterministic() {
        let c = cipher();
        assert_eq!(c.lookup_hash("42"), c.lookup_hash("42"));
        assert_ne!(c.lookup_hash("42"), c.lookup_hash("43"));
    }

    #[test]
    fn test_lookup_hash_is_keyed() {
        let a = cipher().lookup_hash("42");
        let b = FieldCipher::new(&[8u8; 32]).lookup_hash("42");
        assert_ne!(a, b);
    }
}
