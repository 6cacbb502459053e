use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in the keychain.
#[derive(Debug, Error)]
pub enum KeychainError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong password or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Keychain state errors ---
    #[error("Checksum mismatch — keychain data was tampered with or rolled back")]
    IntegrityMismatch,

    #[error("Malformed keychain state: {0}")]
    MalformedState(String),

    // --- Persistence errors ---
    #[error("Keychain not found at {0}")]
    KeychainNotFound(PathBuf),

    #[error("Keychain already exists at {0}")]
    KeychainAlreadyExists(PathBuf),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

/// Convenience type alias for keychain results.
pub type Result<T> = std::result::Result<T, KeychainError>;
