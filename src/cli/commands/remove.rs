//! `keychain remove` — delete the secret for a domain.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_keychain, prompt_password, resolve_paths, save_keychain, validate_domain, Cli};
use crate::errors::{KeychainError, Result};

/// Execute the `remove` command.
pub fn execute(cli: &Cli, domain: &str, force: bool) -> Result<()> {
    validate_domain(domain)?;
    let paths = resolve_paths(cli)?;

    // Unless --force is set, ask for confirmation before removing.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove the secret for '{domain}'?"))
            .default(false)
            .interact()
            .map_err(|e| KeychainError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            return Err(KeychainError::UserCancelled);
        }
    }

    let password = prompt_password()?;
    let mut keychain = open_keychain(&paths, &password)?;

    if keychain.remove(domain) {
        save_keychain(&paths, &keychain)?;
        output::success(&format!("Removed secret for '{domain}'"));
    } else {
        output::info(&format!("No secret stored for '{domain}', nothing to remove."));
    }

    Ok(())
}
