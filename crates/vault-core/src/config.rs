//! Process configuration
//!
//! The vault needs exactly one external value: the encryption secret that
//! keys all credential envelopes. It is read once from the environment and
//! must be non-empty before any credential path may run.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, VaultError};

/// Environment variable holding the encryption secret
pub const ENCRYPTION_SECRET_ENV: &str = "VAULT_ENCRYPTION_SECRET";

/// The server-held secret all field keys are derived from.
///
/// Automatically zeroed when dropped; `Debug` never prints the value.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionSecret {
    value: String,
}

impl EncryptionSecret {
    /// Create from an already-obtained secret string.
    ///
    /// Fails with [`VaultError::MissingSecret`] when the string is empty -
    /// an empty secret must never silently key a cipher.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(VaultError::MissingSecret);
        }
        Ok(Self { value })
    }

    /// Read the secret from `VAULT_ENCRYPTION_SECRET`.
    ///
    /// Absence and emptiness are the same fatal configuration error.
    pub fn from_env() -> Result<Self> {
        match std::env::var(ENCRYPTION_SECRET_ENV) {
            Ok(value) => Self::new(value),
            Err(_) => Err(VaultError::MissingSecret),
        }
    }

    /// Get the secret value (use carefully)
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Debug for EncryptionSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionSecret")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_secret() {
        let secret = EncryptionSecret::new("test-secret-value").unwrap();
        assert_eq!(secret.expose(), "test-secret-value");
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = EncryptionSecret::new("");
        assert!(matches!(result, Err(VaultError::MissingSecret)));
    }

    #[test]
    fn test_debug_redacted() {
        let secret = EncryptionSecret::new("super-secret").unwrap();
        let debug = format!("{:?}", secret);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("super-secret"));
    }
}
