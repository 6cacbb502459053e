//! A single encrypted keychain entry and its codec.
//!
//! An `Entry` holds the random IV and the AES-256-GCM output for one
//! secret value.  Both fields serialize as base64 strings in JSON.  It
//! never carries the domain name or the plaintext.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::format::{base64_decode, base64_encode};
use crate::crypto::primitives::{self, IV_LEN, TAG_LEN};
use crate::errors::{KeychainError, Result};

/// One encrypted secret, stored under its domain index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    /// Fresh 12-byte IV drawn for this encryption.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub iv: Vec<u8>,

    /// Ciphertext with the 16-byte GCM tag appended.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub ciphertext: Vec<u8>,
}

impl Entry {
    /// Check structural lengths without attempting decryption.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.iv.len() != IV_LEN {
            return Err(KeychainError::MalformedState(format!(
                "entry IV must be {IV_LEN} bytes, got {}",
                self.iv.len()
            )));
        }
        if self.ciphertext.len() < TAG_LEN {
            return Err(KeychainError::MalformedState(format!(
                "entry ciphertext shorter than the {TAG_LEN}-byte tag"
            )));
        }
        Ok(())
    }
}

/// Encrypt `plaintext` under `content_key` with a fresh random IV.
pub fn encrypt_entry(content_key: &[u8], plaintext: &str) -> Result<Entry> {
    let iv = primitives::random_bytes(IV_LEN);
    let ciphertext = primitives::aead_encrypt(content_key, &iv, plaintext.as_bytes())?;
    Ok(Entry { iv, ciphertext })
}

/// Verify and decrypt an entry back into its UTF-8 plaintext.
///
/// A wrong key, a tampered IV or ciphertext, and a non-UTF-8 payload all
/// surface as `DecryptionFailed`.
pub fn decrypt_entry(content_key: &[u8], entry: &Entry) -> Result<String> {
    let plaintext = primitives::aead_decrypt(content_key, &entry.iv, &entry.ciphertext)?;

    // On error, zeroize the bytes inside the error before discarding.
    String::from_utf8(plaintext).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        KeychainError::DecryptionFailed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x5Au8; 32];

    #[test]
    fn entry_roundtrip() {
        let entry = encrypt_entry(&KEY, "hunter2").unwrap();
        assert_eq!(entry.iv.len(), IV_LEN);
        assert_eq!(entry.ciphertext.len(), "hunter2".len() + TAG_LEN);
        assert_eq!(decrypt_entry(&KEY, &entry).unwrap(), "hunter2");
    }

    #[test]
    fn empty_secret_roundtrips() {
        let entry = encrypt_entry(&KEY, "").unwrap();
        assert_eq!(decrypt_entry(&KEY, &entry).unwrap(), "");
    }

    #[test]
    fn each_encryption_draws_a_new_iv() {
        let a = encrypt_entry(&KEY, "same").unwrap();
        let b = encrypt_entry(&KEY, "same").unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let entry = encrypt_entry(&KEY, "secret").unwrap();
        let result = decrypt_entry(&[0x5Bu8; 32], &entry);
        assert!(matches!(result, Err(KeychainError::DecryptionFailed)));
    }

    #[test]
    fn swapped_iv_fails_authentication() {
        let a = encrypt_entry(&KEY, "one").unwrap();
        let b = encrypt_entry(&KEY, "two").unwrap();
        let franken = Entry {
            iv: b.iv,
            ciphertext: a.ciphertext,
        };
        assert!(matches!(
            decrypt_entry(&KEY, &franken),
            Err(KeychainError::DecryptionFailed)
        ));
    }

    #[test]
    fn non_utf8_plaintext_is_rejected() {
        let iv = vec![0u8; IV_LEN];
        let ciphertext = primitives::aead_encrypt(&KEY, &iv, &[0xFF, 0xFE]).unwrap();
        let entry = Entry { iv, ciphertext };
        assert!(matches!(
            decrypt_entry(&KEY, &entry),
            Err(KeychainError::DecryptionFailed)
        ));
    }

    #[test]
    fn validate_checks_lengths() {
        let good = encrypt_entry(&KEY, "x").unwrap();
        assert!(good.validate().is_ok());

        let short_iv = Entry {
            iv: vec![0u8; 8],
            ..good.clone()
        };
        assert!(matches!(
            short_iv.validate(),
            Err(KeychainError::MalformedState(_))
        ));

        let short_ct = Entry {
            ciphertext: vec![0u8; TAG_LEN - 1],
            ..good
        };
        assert!(matches!(
            short_ct.validate(),
            Err(KeychainError::MalformedState(_))
        ));
    }
}
