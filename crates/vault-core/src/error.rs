//! Error types for vault-core

use thiserror::Error;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Encryption secret is missing or empty - set VAULT_ENCRYPTION_SECRET")]
    MissingSecret,

    #[error("Key derivation failed: {0}")]
    KeyDerivationError(String),

    #[error("Encryption failed: {0}")]
    EncryptionError(String),

    #[error("Decryption failed: authentication error (wrong secret or tampered data)")]
    AuthenticationFailed,

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Credential not found: {0}")]
    CredentialNotFound(uuid::Uuid),

    #[error("Invalid password options: {0}")]
    InvalidPasswordOptions(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
