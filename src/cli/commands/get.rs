//! `keychain get` — print (or copy) the secret for a domain.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_keychain, prompt_password, resolve_paths, validate_domain, Cli};
use crate::errors::{KeychainError, Result};

/// Execute the `get` command.
pub fn execute(cli: &Cli, domain: &str, copy: bool) -> Result<()> {
    validate_domain(domain)?;
    let paths = resolve_paths(cli)?;

    let password = prompt_password()?;
    let keychain = open_keychain(&paths, &password)?;

    let Some(secret) = keychain.get(domain)? else {
        return Err(KeychainError::CommandFailed(format!(
            "no secret stored for '{domain}'"
        )));
    };
    let secret = Zeroizing::new(secret);

    if copy {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| KeychainError::ClipboardError(e.to_string()))?;
        clipboard
            .set_text(secret.as_str())
            .map_err(|e| KeychainError::ClipboardError(e.to_string()))?;
        output::success(&format!("Secret for '{domain}' copied to clipboard"));
    } else {
        println!("{}", secret.as_str());
    }

    Ok(())
}
