//! Sub-key expansion.
//!
//! From the PBKDF2 master secret we derive two independent keys with
//! HMAC-SHA256 and fixed labels:
//! - `index_key = HMAC(master, "index")` hashes domain names into map keys.
//! - `content_key = HMAC(master, "content")` encrypts secret values.
//!
//! HMAC is a PRF, so distinct labels give unrelated keys without a
//! second slow PBKDF2 pass.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::kdf;
use super::primitives::{self, KEY_LEN};
use crate::errors::Result;

const INDEX_LABEL: &[u8] = b"index";
const CONTENT_LABEL: &[u8] = b"content";

/// The per-session key pair, zeroed when dropped.
///
/// Has no `Serialize`, `Clone` or `Debug` impl.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKeySet {
    index_key: [u8; KEY_LEN],
    content_key: [u8; KEY_LEN],
}

impl DerivedKeySet {
    /// Run the full derivation: password + salt -> PBKDF2 -> HMAC expansion.
    pub fn derive(password: &str, salt: &[u8]) -> Result<Self> {
        let master = kdf::derive_master_secret(password, salt)?;
        Ok(Self::expand(&master))
    }

    /// Expand an already-derived master secret into the two sub-keys.
    pub fn expand(master: &[u8]) -> Self {
        Self {
            index_key: primitives::hmac_sha256(master, INDEX_LABEL),
            content_key: primitives::hmac_sha256(master, CONTENT_LABEL),
        }
    }

    /// Key used for HMAC domain indexing.
    pub fn index_key(&self) -> &[u8; KEY_LEN] {
        &self.index_key
    }

    /// Key used for AES-256-GCM entry encryption.
    pub fn content_key(&self) -> &[u8; KEY_LEN] {
        &self.content_key
    }

    /// Map a plaintext domain name to its hex-encoded HMAC index.
    pub fn domain_index(&self, domain: &str) -> String {
        hex::encode(primitives::hmac_sha256(&self.index_key, domain.as_bytes()))
    }
}
