use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{KeychainError, Result};

/// Project-level configuration, loaded from `.keychain.toml`.
///
/// Every field has a sensible default so the keychain works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the working directory) holding the keychain file.
    #[serde(default = "default_keychain_dir")]
    pub keychain_dir: String,

    /// Name of the keychain file inside `keychain_dir`.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Record the checksum of every write and demand it on the next open.
    #[serde(default = "default_pin_checksum")]
    pub pin_checksum: bool,

    /// Where to keep the pinned checksum.  Defaults to
    /// `<keychain_dir>/keychain.pin`; put it on a different medium to
    /// catch a rollback of the whole directory.
    #[serde(default)]
    pub pin_path: Option<String>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_keychain_dir() -> String {
    ".keychain".to_string()
}

fn default_file_name() -> String {
    "keychain.json".to_string()
}

fn default_pin_checksum() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            keychain_dir: default_keychain_dir(),
            file_name: default_file_name(),
            pin_checksum: default_pin_checksum(),
            pin_path: None,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    const FILE_NAME: &'static str = ".keychain.toml";

    /// Default pin file name inside the keychain directory.
    const PIN_FILE_NAME: &'static str = "keychain.pin";

    /// Load settings from `<project_dir>/.keychain.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            KeychainError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        tracing::debug!(path = %config_path.display(), "loaded settings");

        Ok(settings)
    }

    /// Full path to the keychain file.
    ///
    /// Example: `project_dir/.keychain/keychain.json`
    pub fn keychain_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.keychain_dir).join(&self.file_name)
    }

    /// Full path to the pin file, or `None` when pinning is disabled.
    pub fn pin_path(&self, project_dir: &Path) -> Option<PathBuf> {
        if !self.pin_checksum {
            return None;
        }
        Some(match &self.pin_path {
            Some(custom) => project_dir.join(custom),
            None => project_dir
                .join(&self.keychain_dir)
                .join(Self::PIN_FILE_NAME),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────
