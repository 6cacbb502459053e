//! `keychain set` — add or update the secret for a domain.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_keychain, prompt_password, resolve_paths, save_keychain, validate_domain, Cli};
use crate::errors::{KeychainError, Result};

/// Execute the `set` command.
pub fn execute(cli: &Cli, domain: &str, value: Option<&str>) -> Result<()> {
    validate_domain(domain)?;
    let paths = resolve_paths(cli)?;

    // Determine the secret value from one of three sources.
    let secret = if let Some(v) = value {
        // Source 1: Inline value on the command line.
        output::warning("Value provided on the command line may appear in shell history.");
        Zeroizing::new(v.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string())
    } else {
        // Source 3: Interactive secure prompt (default).
        let v = dialoguer::Password::new()
            .with_prompt(format!("Enter secret for {domain}"))
            .interact()
            .map_err(|e| KeychainError::CommandFailed(format!("input prompt: {e}")))?;
        Zeroizing::new(v)
    };

    // Open the keychain, set the secret, and save.
    let password = prompt_password()?;
    let mut keychain = open_keychain(&paths, &password)?;

    let existed = keychain.contains(domain);
    keychain.set(domain, &secret)?;
    save_keychain(&paths, &keychain)?;

    let op = if existed { "updated" } else { "added" };
    output::success(&format!(
        "Secret for '{domain}' {op} ({} total)",
        keychain.len()
    ));

    Ok(())
}
