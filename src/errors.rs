use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in credvault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Format errors ---
    #[error("Vault file is corrupt: {0}")]
    CorruptFormat(String),

    #[error("Field '{field}' is too long ({len} bytes, max 255)")]
    FieldTooLong { field: &'static str, len: usize },

    // --- Crypto errors ---
    #[error("Authentication failed: wrong passphrase or tampered vault")]
    AuthenticationFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // --- Vault errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Vault is locked")]
    VaultLocked,

    #[error("Entry '{0}' already exists")]
    DuplicateEntry(String),

    #[error("Entry '{0}' not found")]
    EntryNotFound(String),

    // --- Sync errors ---
    #[error("Sync error: {0}")]
    SyncError(String),

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
}

/// Convenience type alias for credvault results.
pub type Result<T> = std::result::Result<T, VaultError>;
