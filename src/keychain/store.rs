//! High-level keychain operations.
//!
//! `Keychain` owns the encrypted state and the session keys, so the rest
//! of the application works with simple calls like
//! `keychain.set("example.com", "hunter2")`.  It never touches storage:
//! callers persist the `(serialized, checksum)` pair from `export` and
//! hand it back to `restore`.

use std::fmt;

use zeroize::Zeroize;

use crate::crypto::kdf::generate_salt;
use crate::crypto::keys::DerivedKeySet;
use crate::errors::{KeychainError, Result};

use super::entry::{decrypt_entry, encrypt_entry};
use super::format::{self, KeychainState};

/// The main keychain handle.  Create one with `Keychain::create` or
/// `Keychain::restore`, then use its methods to manage secrets.
///
/// Not `Serialize` and not `Clone`: the only way state leaves a
/// `Keychain` is through `export`, which never includes key material.
pub struct Keychain {
    /// Salt and encrypted entries; exactly what `export` writes out.
    state: KeychainState,

    /// Index and content keys for this session (zeroized on drop).
    keys: DerivedKeySet,
}

impl Keychain {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create an empty keychain protected by `password`.
    ///
    /// Draws a fresh random salt and runs the full key derivation.  Fails
    /// only if derivation fails (for example a password over 64
    /// characters).  The empty password is allowed.
    pub fn create(password: &str) -> Result<Self> {
        let salt = generate_salt();
        let keys = DerivedKeySet::derive(password, &salt)?;

        tracing::debug!("created empty keychain");

        Ok(Self {
            state: KeychainState::new(salt.to_vec()),
            keys,
        })
    }

    /// Rebuild a keychain from the output of [`Keychain::export`].
    ///
    /// When `expected_checksum` is given, the SHA-256 of `serialized` must
    /// match it or `IntegrityMismatch` is returned before anything is
    /// parsed.  This catches a rollback only if the caller got the
    /// checksum from a place the attacker cannot also rewind; a stale file
    /// with its own correct checksum passes.
    ///
    /// Entries are not decrypted here.  A wrong password yields a
    /// keychain whose every `get` fails with `DecryptionFailed`.
    pub fn restore(
        password: &str,
        serialized: &str,
        expected_checksum: Option<&str>,
    ) -> Result<Self> {
        // 1. Integrity first, over the exact bytes we were given.
        match expected_checksum {
            Some(expected) => format::verify_checksum(serialized, expected)?,
            None => tracing::debug!("restoring keychain without a checksum"),
        }

        // 2. Strict parse of the untrusted JSON.
        let state = format::parse(serialized)?;

        // 3. Re-derive the session keys from the persisted salt.
        let keys = DerivedKeySet::derive(password, &state.salt)?;

        tracing::debug!(entries = state.kvs.len(), "restored keychain");

        Ok(Self { state, keys })
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Add or overwrite the secret for `domain`.
    ///
    /// Every call encrypts under a fresh IV, even for an unchanged value.
    pub fn set(&mut self, domain: &str, secret: &str) -> Result<()> {
        let index = self.keys.domain_index(domain);
        let entry = encrypt_entry(self.keys.content_key(), secret)?;
        self.state.kvs.insert(index, entry);
        Ok(())
    }

    /// Decrypt and return the secret for `domain`, or `None` if absent.
    ///
    /// Under a wrong password the domain index never matches, so a miss
    /// is only reported as `None` once some stored entry authenticates
    /// with the session key.  Otherwise the miss is `DecryptionFailed`.
    ///
    /// A wrong password and a keychain whose every entry is corrupted look
    /// the same from here: in both cases a miss fails with
    /// `DecryptionFailed`, even for a domain that was never stored.  An
    /// empty keychain always misses with `None`.  Restoring with a checksum
    /// rules out the corrupted case for state produced by `export`.
    pub fn get(&self, domain: &str) -> Result<Option<String>> {
        let index = self.keys.domain_index(domain);
        match self.state.kvs.get(&index) {
            Some(entry) => decrypt_entry(self.keys.content_key(), entry).map(Some),
            None => {
                self.check_session_key()?;
                Ok(None)
            }
        }
    }

    /// Remove the entry for `domain`.  Returns whether one was present.
    pub fn remove(&mut self, domain: &str) -> bool {
        let index = self.keys.domain_index(domain);
        self.state.kvs.remove(&index).is_some()
    }

    // Succeeds if the keychain is empty or any entry authenticates.
    fn check_session_key(&self) -> Result<()> {
        if self.state.kvs.is_empty() {
            return Ok(());
        }
        for entry in self.state.kvs.values() {
            if let Ok(mut probe) = decrypt_entry(self.keys.content_key(), entry) {
                probe.zeroize();
                return Ok(());
            }
        }
        tracing::debug!("no stored entry authenticates under the session key");
        Err(KeychainError::DecryptionFailed)
    }

    /// Decrypt every entry once, discarding the plaintexts.
    ///
    /// Returns the number of entries checked.  Fails with
    /// `DecryptionFailed` on the first entry that does not authenticate,
    /// which after `restore` usually means a wrong password.
    pub fn verify_entries(&self) -> Result<usize> {
        for entry in self.state.kvs.values() {
            let mut plaintext = decrypt_entry(self.keys.content_key(), entry)?;
            plaintext.zeroize();
        }
        Ok(self.state.kvs.len())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Serialize the keychain and compute its checksum.
    ///
    /// Returns `(serialized, checksum)`.  Store the checksum somewhere the
    /// serialized data's medium cannot overwrite to get rollback
    /// detection on the next `restore`.
    pub fn export(&self) -> Result<(String, String)> {
        let serialized = format::serialize(&self.state)?;
        let checksum = format::checksum(&serialized);

        tracing::debug!(
            entries = self.state.kvs.len(),
            checksum = &checksum[..12],
            "exported keychain"
        );

        Ok((serialized, checksum))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.state.kvs.len()
    }

    /// Returns `true` if the keychain holds no entries.
    pub fn is_empty(&self) -> bool {
        self.state.kvs.is_empty()
    }

    /// Returns `true` if an entry exists for `domain`.
    ///
    /// Index lookup only; no decryption is performed.
    pub fn contains(&self, domain: &str) -> bool {
        self.state.kvs.contains_key(&self.keys.domain_index(domain))
    }

    /// The keychain's salt, hex-encoded.  Not secret.
    pub fn salt_hex(&self) -> String {
        hex::encode(&self.state.salt)
    }
}

impl fmt::Debug for Keychain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keychain")
            .field("entries", &self.state.kvs.len())
            .field("keys", &"<redacted>")
            .finish()
    }
}
