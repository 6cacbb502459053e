//! Cryptographic primitives for the keychain.
//!
//! This module provides:
//! - Wrappers over CSPRNG, PBKDF2, HMAC, SHA-256 and AES-256-GCM (`primitives`)
//! - Password policy and PBKDF2 master-secret derivation (`kdf`)
//! - HMAC expansion into the index/content key pair (`keys`)

pub mod kdf;
pub mod keys;
pub mod primitives;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{DerivedKeySet, generate_salt, ...};
pub use kdf::{derive_master_secret, generate_salt, validate_password};
pub use keys::DerivedKeySet;
pub use primitives::{aead_decrypt, aead_encrypt, hmac_sha256, pbkdf2_sha256, random_bytes, sha256};
