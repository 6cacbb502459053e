//! Password-protected keychain.
//!
//! A [`Keychain`](keychain::Keychain) maps domain names to secrets under a
//! single master password.  Domains are stored only as HMAC indexes,
//! every secret is sealed with AES-256-GCM under a fresh IV, and the
//! exported state carries a SHA-256 checksum for tamper and rollback
//! detection.
//!
//! ```no_run
//! use keychain::keychain::Keychain;
//!
//! # fn main() -> keychain::errors::Result<()> {
//! let mut kc = Keychain::create("correct horse")?;
//! kc.set("example.com", "hunter2")?;
//!
//! let (data, checksum) = kc.export()?;
//! let restored = Keychain::restore("correct horse", &data, Some(&checksum))?;
//! assert_eq!(restored.get("example.com")?.as_deref(), Some("hunter2"));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod keychain;
