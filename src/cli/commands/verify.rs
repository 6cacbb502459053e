//! `keychain verify` — check integrity, rollback status and password.

use crate::cli::output;
use crate::cli::storage;
use crate::cli::{open_keychain, pinned_checksums, prompt_password, resolve_paths, Cli};
use crate::errors::{KeychainError, Result};
use crate::keychain::format;

/// Execute the `verify` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let paths = resolve_paths(cli)?;
    let envelope = storage::read_keychain(&paths.keychain)?;

    let pinned = pinned_checksums(&paths)?;

    let password = prompt_password()?;
    let keychain = match open_keychain(&paths, &password) {
        Ok(kc) => kc,
        Err(KeychainError::IntegrityMismatch) => {
            let actual = format::checksum(&envelope.data);
            if !pinned.is_empty() && !pinned.contains(&actual) {
                output::error("Keychain file does not match the pinned checksum.");
                output::tip("It was replaced by an older copy or rewritten elsewhere.");
            } else {
                output::error("Keychain data does not match its checksum.");
            }
            return Err(KeychainError::IntegrityMismatch);
        }
        Err(e) => return Err(e),
    };

    // Authenticate every entry; a wrong password fails here.
    let checked = keychain.verify_entries()?;

    let pin_status = match pinned.len() {
        0 => "not pinned".to_string(),
        1 => "matches".to_string(),
        n => format!("matches ({n} trusted, last save was interrupted)"),
    };

    output::print_status_table(&[
        ("File", paths.keychain.display().to_string()),
        ("Saved at", envelope.saved_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ("Entries", checked.to_string()),
        ("Salt", keychain.salt_hex()),
        ("Checksum", output::fingerprint(&envelope.checksum).to_string()),
        ("Pin", pin_status),
    ]);

    output::success("Keychain verified");
    if pinned.is_empty() {
        output::warning("No checksum pin; an older copy of this file would also verify.");
    }

    Ok(())
}
