//! Terminal output for the keychain commands.
//!
//! Status lines go to stdout, problems to stderr, so `keychain get`
//! stays pipe-friendly: its only stdout line is the secret itself.

use comfy_table::{ContentArrangement, Table};
use console::{style, StyledObject};

/// Number of checksum characters shown in human-facing messages.
const FINGERPRINT_LEN: usize = 12;

fn mark(symbol: &'static str) -> StyledObject<&'static str> {
    style(symbol).bold()
}

/// `✓ {msg}` on stdout.
pub fn success(msg: &str) {
    println!("{} {msg}", mark("\u{2713}").green());
}

/// `✗ {msg}` on stderr.
pub fn error(msg: &str) {
    eprintln!("{} {msg}", mark("\u{2717}").red());
}

/// `⚠ {msg}` on stderr.
pub fn warning(msg: &str) {
    eprintln!("{} {msg}", mark("\u{26a0}").yellow());
}

/// `ℹ {msg}` on stdout.
pub fn info(msg: &str) {
    println!("{} {msg}", mark("\u{2139}").blue());
}

/// Dimmed hint line.
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Leading characters of a checksum, enough to compare by eye.
pub fn fingerprint(checksum: &str) -> &str {
    checksum.get(..FINGERPRINT_LEN).unwrap_or(checksum)
}

/// Render the `verify` report as a two-column table.
pub fn print_status_table(rows: &[(&str, String)]) {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Property", "Value"]);

    for (name, value) in rows {
        table.add_row(vec![(*name).to_string(), value.clone()]);
    }

    println!("{table}");
}
