//! CLI module — Clap argument parser, output helpers, file storage, and
//! command implementations.

pub mod commands;
pub mod output;
pub mod storage;

use std::path::PathBuf;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::kdf::{validate_password, MAX_PASSWORD_CHARS};
use crate::errors::{KeychainError, Result};
use crate::keychain::{format, Keychain};

/// Longest accepted domain name (DNS limit plus some slack for labels).
const MAX_DOMAIN_LEN: usize = 255;

/// Environment variable consulted before prompting for the password.
const PASSWORD_ENV: &str = "KEYCHAIN_PASSWORD";

/// keychain CLI: password-protected storage for per-domain secrets.
#[derive(Parser)]
#[command(
    name = "keychain",
    about = "Password-protected keychain for per-domain secrets",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Keychain directory (overrides `keychain_dir` in .keychain.toml)
    #[arg(long, global = true)]
    pub dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty keychain
    Init,

    /// Store a secret for a domain (add or update)
    Set {
        /// Domain name (e.g. example.com)
        domain: String,
        /// Secret value (omit for interactive prompt)
        value: Option<String>,
    },

    /// Print the secret stored for a domain
    Get {
        /// Domain name
        domain: String,
        /// Copy to the clipboard instead of printing
        #[arg(short, long)]
        copy: bool,
    },

    /// Remove the secret stored for a domain
    Remove {
        /// Domain name
        domain: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Check the keychain file against the pinned checksum and password
    Verify,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Where the keychain file and its checksum pin live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeychainPaths {
    pub keychain: PathBuf,
    pub pin: Option<PathBuf>,
}

/// Resolve file locations from `.keychain.toml` and the `--dir` flag.
pub fn resolve_paths(cli: &Cli) -> Result<KeychainPaths> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;
    if let Some(dir) = &cli.dir {
        settings.keychain_dir = dir.clone();
    }

    Ok(KeychainPaths {
        keychain: settings.keychain_path(&cwd),
        pin: settings.pin_path(&cwd),
    })
}

/// Checksums the pin currently trusts; empty when pinning is off or no
/// pin has been written yet.
pub fn pinned_checksums(paths: &KeychainPaths) -> Result<Vec<String>> {
    match &paths.pin {
        Some(pin_path) => storage::read_pins(pin_path),
        None => Ok(Vec::new()),
    }
}

/// Load and restore the keychain at `paths`.
///
/// The expected checksum comes from the pin when one exists, so a
/// keychain file swapped for an older copy fails with `IntegrityMismatch`.
/// Without a pin the envelope's own checksum is used, which only catches
/// damage to the data itself.
pub fn open_keychain(paths: &KeychainPaths, password: &str) -> Result<Keychain> {
    let envelope = storage::read_keychain(&paths.keychain)?;
    let pins = pinned_checksums(paths)?;

    let expected = if pins.is_empty() {
        if paths.pin.is_some() {
            tracing::warn!("no checksum pin found; rollback detection is unavailable");
        }
        envelope.checksum
    } else {
        if pins.len() > 1 {
            tracing::warn!(
                pinned = pins.len(),
                "checksum pin is left over from an interrupted save; the next save tightens it"
            );
        }
        let actual = format::checksum(&envelope.data);
        match pins.into_iter().find(|pin| *pin == actual) {
            Some(pin) => pin,
            None => return Err(KeychainError::IntegrityMismatch),
        }
    };

    Keychain::restore(password, &envelope.data, Some(&expected))
}

/// Export the keychain, write it atomically, and update the pin.
///
/// The pin is updated in two steps around the file write: first the new
/// checksum is trusted alongside the current ones, then the old ones are
/// dropped.  A failure at any point leaves a keychain file that matches
/// the pin.  Returns the new checksum.
pub fn save_keychain(paths: &KeychainPaths, keychain: &Keychain) -> Result<String> {
    let (data, checksum) = keychain.export()?;

    let Some(pin_path) = &paths.pin else {
        storage::write_keychain(&paths.keychain, &data, &checksum)?;
        return Ok(checksum);
    };

    let mut staged = storage::read_pins(pin_path)?;
    if !staged.contains(&checksum) {
        staged.push(checksum.clone());
    }
    storage::write_pins(pin_path, &staged)?;

    storage::write_keychain(&paths.keychain, &data, &checksum)?;

    // The keychain is saved either way; a stale extra pin only widens
    // what the next open accepts until a later save succeeds.
    if let Err(e) = storage::write_pins(pin_path, std::slice::from_ref(&checksum)) {
        tracing::warn!(
            pin = %pin_path.display(),
            error = %e,
            "keychain saved but the checksum pin still trusts the previous version"
        );
    }

    Ok(checksum)
}

/// Get the master password, trying in order:
/// 1. `KEYCHAIN_PASSWORD` env var (scripts/CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| KeychainError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used by `init`).
///
/// Also respects `KEYCHAIN_PASSWORD` for scripted usage.  Passwords over
/// the length limit are refused rather than truncated.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        validate_password(&pw)?;
        return Ok(pw);
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .allow_empty_password(true)
            .interact()
            .map_err(|e| KeychainError::CommandFailed(format!("password prompt: {e}")))?;
        let password = Zeroizing::new(password);

        if validate_password(&password).is_err() {
            output::warning(&format!(
                "Password must be at most {MAX_PASSWORD_CHARS} characters. Try again."
            ));
            continue;
        }

        return Ok(password);
    }
}

fn password_from_env() -> Option<Zeroizing<String>> {
    match std::env::var(PASSWORD_ENV) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}

/// Validate that a domain argument is usable as a keychain key.
///
/// Must be non-empty, not only whitespace, and at most 255 bytes.
pub fn validate_domain(domain: &str) -> Result<()> {
    if domain.trim().is_empty() {
        return Err(KeychainError::CommandFailed(
            "domain cannot be empty".into(),
        ));
    }

    if domain.len() > MAX_DOMAIN_LEN {
        return Err(KeychainError::CommandFailed(format!(
            "domain cannot exceed {MAX_DOMAIN_LEN} bytes"
        )));
    }

    if domain.chars().any(char::is_control) {
        return Err(KeychainError::CommandFailed(
            "domain cannot contain control characters".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_domains() {
        assert!(validate_domain("example.com").is_ok());
        assert!(validate_domain("www.stanford.edu").is_ok());
        assert!(validate_domain("service1").is_ok());
        assert!(validate_domain("https://login.example.com/path").is_ok());
    }

    #[test]
    fn rejects_empty_domain() {
        assert!(validate_domain("").is_err());
        assert!(validate_domain("   ").is_err());
    }

    #[test]
    fn rejects_control_chars() {
        assert!(validate_domain("exa\nmple.com").is_err());
        assert!(validate_domain("tab\there").is_err());
    }

    #[test]
    fn rejects_too_long_domain() {
        let long = "a".repeat(MAX_DOMAIN_LEN + 1);
        assert!(validate_domain(&long).is_err());
    }
}
