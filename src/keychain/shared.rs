//! A `Keychain` that can be shared between threads.
//!
//! One mutex guards the entries and the session keys together and is
//! held for the whole of each call, so no caller ever observes a
//! half-applied `set` or `remove`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::store::Keychain;
use crate::errors::Result;

/// Cloneable, thread-safe handle to one `Keychain`.
#[derive(Clone, Debug)]
pub struct SharedKeychain {
    inner: Arc<Mutex<Keychain>>,
}

impl SharedKeychain {
    /// Wrap an existing keychain.
    pub fn new(keychain: Keychain) -> Self {
        Self {
            inner: Arc::new(Mutex::new(keychain)),
        }
    }

    // Every operation completes or fails as a whole before the guard is
    // released, so a poisoned lock still protects a consistent map.
    fn lock(&self) -> MutexGuard<'_, Keychain> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`Keychain::set`].
    pub fn set(&self, domain: &str, secret: &str) -> Result<()> {
        self.lock().set(domain, secret)
    }

    /// See [`Keychain::get`].
    pub fn get(&self, domain: &str) -> Result<Option<String>> {
        self.lock().get(domain)
    }

    /// See [`Keychain::remove`].
    pub fn remove(&self, domain: &str) -> bool {
        self.lock().remove(domain)
    }

    /// See [`Keychain::export`].
    pub fn export(&self) -> Result<(String, String)> {
        self.lock().export()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the keychain holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Swap in a keychain restored elsewhere, returning the old one.
    ///
    /// Pair with [`Keychain::restore`]: restore first, then replace, so a
    /// failed restore leaves the shared keychain untouched.
    pub fn replace(&self, keychain: Keychain) -> Keychain {
        std::mem::replace(&mut *self.lock(), keychain)
    }
}

impl From<Keychain> for SharedKeychain {
    fn from(keychain: Keychain) -> Self {
        Self::new(keychain)
    }
}
