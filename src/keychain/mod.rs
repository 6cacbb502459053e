//! Keychain module — encrypted domain/secret storage.
//!
//! This module provides:
//! - The `Entry` type and its AES-GCM codec (`entry`)
//! - Canonical JSON representation with checksum verification (`format`)
//! - The `Keychain` store with create/set/get/remove/export/restore (`store`)
//! - A mutex-guarded handle for multi-threaded callers (`shared`)

pub mod entry;
pub mod format;
pub mod shared;
pub mod store;

// Re-export the most commonly used items.
pub use entry::Entry;
pub use format::KeychainState;
pub use shared::SharedKeychain;
pub use store::Keychain;
