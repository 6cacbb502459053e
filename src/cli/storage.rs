//! Keychain file and checksum pin on disk.
//!
//! The keychain file is a small JSON envelope around the exported state:
//!
//! ```text
//! {"data":"<serialized keychain>","checksum":"<sha256 hex>","saved_at":"<RFC 3339>"}
//! ```
//!
//! The pin file holds the trusted checksums, one per line.  After a
//! completed save it holds exactly one: the checksum of the last write
//! this machine made.  Opening compares the data against the pin rather
//! than the envelope's own checksum, so replacing the keychain file with
//! an older copy is caught as long as the pin lives somewhere the
//! attacker did not also roll back.
//!
//! While a save is in flight the pin lists both the old and the new
//! checksum, so a save interrupted between the two files leaves a
//! keychain that still opens instead of one that looks rolled back.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{KeychainError, Result};

/// What the keychain file contains.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Output of `Keychain::export`, stored verbatim.
    pub data: String,

    /// Checksum reported by `Keychain::export` for `data`.
    pub checksum: String,

    /// When this file was written.
    pub saved_at: DateTime<Utc>,
}

/// Write the keychain file **atomically**.
pub fn write_keychain(path: &Path, data: &str, checksum: &str) -> Result<()> {
    let envelope = Envelope {
        data: data.to_string(),
        checksum: checksum.to_string(),
        saved_at: Utc::now(),
    };
    let bytes = serde_json::to_vec_pretty(&envelope)
        .map_err(|e| KeychainError::SerializationError(format!("envelope: {e}")))?;

    write_atomic(path, &bytes)?;
    tracing::debug!(path = %path.display(), "wrote keychain file");
    Ok(())
}

/// Read the keychain file.
pub fn read_keychain(path: &Path) -> Result<Envelope> {
    if !path.exists() {
        return Err(KeychainError::KeychainNotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| KeychainError::MalformedState(format!("keychain file: {e}")))
}

/// Read the pinned checksums.  Empty if no pin has been written yet.
pub fn read_pins(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_ascii_lowercase)
        .collect())
}

/// Replace the pin with `checksums`.
pub fn write_pins(path: &Path, checksums: &[String]) -> Result<()> {
    let mut contents = String::new();
    for checksum in checksums {
        contents.push_str(checksum);
        contents.push('\n');
    }
    write_atomic(path, contents.as_bytes())
}

/// Write to a temp file in the same directory, then rename over `path`.
///
/// The rename ensures readers never see a half-written file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    if !parent.as_os_str().is_empty() && !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, bytes)?;

    // On Unix, restrict permissions to owner-only read/write.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}
