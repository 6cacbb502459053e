//! Thin wrappers over the cryptographic building blocks.
//!
//! Every other module goes through these functions instead of touching
//! the RustCrypto crates directly, so the algorithm choices live in one
//! place:
//!
//! - randomness: `rand` thread-local CSPRNG
//! - password hashing: PBKDF2-HMAC-SHA256
//! - keyed hashing: HMAC-SHA256
//! - digests: SHA-256
//! - authenticated encryption: AES-256-GCM (12-byte IV, 16-byte tag)

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use hmac::digest::Key;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::errors::{KeychainError, Result};

/// Size of an AES-256-GCM initialization vector in bytes.
pub const IV_LEN: usize = 12;

/// Size of the GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Size of an AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// Size of a SHA-256 digest / HMAC-SHA256 tag in bytes.
pub const DIGEST_LEN: usize = 32;

/// SHA-256 input block size; HMAC pads or hashes keys to this length.
const SHA256_BLOCK_LEN: usize = 64;

type HmacSha256 = Hmac<Sha256>;

/// Return `n` bytes from a cryptographically secure generator.
pub fn random_bytes(n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    rand::rng().fill_bytes(&mut buf);
    buf
}

/// Run PBKDF2-HMAC-SHA256 and return `output_len` derived bytes.
///
/// An empty password is accepted. An empty salt, a zero iteration count
/// or a zero output length is rejected.
pub fn pbkdf2_sha256(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    output_len: usize,
) -> Result<Vec<u8>> {
    if salt.is_empty() {
        return Err(KeychainError::KeyDerivationFailed(
            "PBKDF2 salt cannot be empty".into(),
        ));
    }
    if iterations == 0 {
        return Err(KeychainError::KeyDerivationFailed(
            "PBKDF2 iterations must be at least 1".into(),
        ));
    }
    if output_len == 0 {
        return Err(KeychainError::KeyDerivationFailed(
            "PBKDF2 output length must be at least 1".into(),
        ));
    }

    let mut out = vec![0u8; output_len];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out);
    Ok(out)
}

/// Compute HMAC-SHA256 of `message` under `key`.
///
/// Keys of any length are accepted: longer than one block they are hashed
/// first, shorter ones are zero-padded (RFC 2104), so this cannot fail.
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; DIGEST_LEN] {
    let mut block = Zeroizing::new([0u8; SHA256_BLOCK_LEN]);
    if key.len() > SHA256_BLOCK_LEN {
        block[..DIGEST_LEN].copy_from_slice(&sha256(key));
    } else {
        block[..key.len()].copy_from_slice(key);
    }

    let mut mac = <HmacSha256 as Mac>::new(Key::<HmacSha256>::from_slice(&block[..]));
    mac.update(message);
    mac.finalize().into_bytes().into()
}

/// Compute the SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> [u8; DIGEST_LEN] {
    Sha256::digest(data).into()
}

/// Encrypt and authenticate `plaintext` under a 32-byte `key` and 12-byte `iv`.
///
/// Returns ciphertext with the 16-byte tag appended.
pub fn aead_encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = <Aes256Gcm as KeyInit>::new_from_slice(key)
        .map_err(|e| KeychainError::EncryptionFailed(format!("invalid key length: {e}")))?;

    if iv.len() != IV_LEN {
        return Err(KeychainError::EncryptionFailed(format!(
            "IV must be {IV_LEN} bytes, got {}",
            iv.len()
        )));
    }

    cipher
        .encrypt(Nonce::from_slice(iv), plaintext)
        .map_err(|e| KeychainError::EncryptionFailed(format!("encryption error: {e}")))
}

/// Verify and decrypt data produced by [`aead_encrypt`].
///
/// Every failure (bad tag, wrong key, malformed lengths) collapses into
/// `DecryptionFailed` so callers cannot tell them apart.
pub fn aead_decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if iv.len() != IV_LEN || ciphertext.len() < TAG_LEN {
        return Err(KeychainError::DecryptionFailed);
    }

    let cipher = <Aes256Gcm as KeyInit>::new_from_slice(key)
        .map_err(|_| KeychainError::DecryptionFailed)?;

    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| KeychainError::DecryptionFailed)
}
