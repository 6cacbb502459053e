//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! A single slow PBKDF2 pass turns the master password and the
//! keychain's salt into a 256-bit master secret.  Sub-keys are expanded
//! from it in `keys` with cheap HMAC calls.

use zeroize::Zeroizing;

use super::primitives;
use crate::errors::{KeychainError, Result};

/// Length of the random salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the PBKDF2 output in bytes (256 bits).
const MASTER_LEN: usize = 32;

/// PBKDF2 iteration count.  Fixed, because the serialized keychain does
/// not record it.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Longest accepted master password, in characters.
pub const MAX_PASSWORD_CHARS: usize = 64;

/// Reject master passwords longer than [`MAX_PASSWORD_CHARS`].
///
/// Over-long passwords are never truncated; silently dropping a suffix
/// would let two different passwords open the same keychain.
pub fn validate_password(password: &str) -> Result<()> {
    let len = password.chars().count();
    if len > MAX_PASSWORD_CHARS {
        return Err(KeychainError::KeyDerivationFailed(format!(
            "master password must be at most {MAX_PASSWORD_CHARS} characters (got {len})"
        )));
    }
    Ok(())
}

/// Derive the 32-byte master secret from a password and salt.
///
/// The same password + salt always produce the same secret.  The empty
/// password is valid.
pub fn derive_master_secret(password: &str, salt: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    validate_password(password)?;
    let secret =
        primitives::pbkdf2_sha256(password.as_bytes(), salt, PBKDF2_ITERATIONS, MASTER_LEN)?;
    Ok(Zeroizing::new(secret))
}

/// Generate a cryptographically random salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&primitives::random_bytes(SALT_LEN));
    salt
}
