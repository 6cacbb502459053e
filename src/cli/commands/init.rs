//! `keychain init` — create a new, empty keychain file.

use crate::cli::output;
use crate::cli::{prompt_new_password, resolve_paths, save_keychain, Cli};
use crate::errors::{KeychainError, Result};
use crate::keychain::Keychain;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let paths = resolve_paths(cli)?;

    // 1. Refuse to overwrite an existing keychain.
    if paths.keychain.exists() {
        output::tip("Use `keychain set <DOMAIN>` to add secrets to the existing keychain.");
        return Err(KeychainError::KeychainAlreadyExists(paths.keychain));
    }

    // 2. Prompt for a new password (with confirmation).
    let password = prompt_new_password()?;

    // 3. Derive keys and write the empty keychain (and its pin).
    let keychain = Keychain::create(&password)?;
    let checksum = save_keychain(&paths, &keychain)?;

    output::success(&format!(
        "Keychain created at {}",
        paths.keychain.display()
    ));
    match &paths.pin {
        Some(pin) => output::info(&format!(
            "Checksum {} pinned at {}",
            output::fingerprint(&checksum),
            pin.display()
        )),
        None => output::warning("Checksum pinning is disabled; rollbacks will not be detected."),
    }

    output::tip("Run `keychain set <DOMAIN>` to store a secret.");

    Ok(())
}
