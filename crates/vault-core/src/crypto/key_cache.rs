//! Key derivation with per-secret caching
//!
//! Keys are derived from the encryption secret with scrypt, which is
//! deliberately slow. A deployment uses a single static secret, so the
//! derived key is cached in memory keyed by the secret string and the cost
//! is paid once per process.

use std::collections::HashMap;

use scrypt::{scrypt, Params};
use tokio::sync::RwLock;
use tracing::debug;

use super::DerivedKey;
use crate::error::{Result, VaultError};

/// Salt literal existing envelopes were keyed with. Changing it makes every
/// previously stored ciphertext undecryptable.
const KDF_SALT: &[u8] = b"salt";

/// scrypt cost parameters: N = 2^14, r = 8, p = 1
const SCRYPT_LOG_N: u8 = 14;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

/// Maps encryption secrets to derived keys, deriving at most once per
/// distinct secret per process.
///
/// The map is append-only: entries are inserted once and never updated, so
/// concurrent readers never observe a partially computed key. Two callers
/// racing on a first use may both derive; scrypt is deterministic, so the
/// map settles on one consistent value either way.
pub struct KeyCache {
    keys: RwLock<HashMap<String, DerivedKey>>,
}

impl KeyCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Look up the key for `secret`, deriving and caching it on first use.
    ///
    /// Derivation runs on a blocking thread so the async runtime keeps
    /// serving other requests while scrypt grinds.
    pub async fn get_or_derive(&self, secret: &str) -> Result<DerivedKey> {
        if secret.is_empty() {
            return Err(VaultError::MissingSecret);
        }

        if let Some(key) = self.keys.read().await.get(secret) {
            return Ok(key.clone());
        }

        debug!("Deriving key for new secret");
        let key = derive_key(secret.to_string()).await?;

        let mut keys = self.keys.write().await;
        let entry = keys.entry(secret.to_string()).or_insert(key);
        Ok(entry.clone())
    }
}

impl Default for KeyCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a 256-bit key from a secret using scrypt with the fixed salt
async fn derive_key(secret: String) -> Result<DerivedKey> {
    tokio::task::spawn_blocking(move || {
        let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, 32)
            .map_err(|e| VaultError::KeyDerivationError(e.to_string()))?;

        let mut key = [0u8; 32];
        scrypt(secret.as_bytes(), KDF_SALT, &params, &mut key)
            .map_err(|e| VaultError::KeyDerivationError(e.to_string()))?;

        Ok(DerivedKey::new(key))
    })
    .await
    .map_err(|e| VaultError::KeyDerivationError(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_derive_key_deterministic() {
        let cache = KeyCache::new();
        let other = KeyCache::new();

        let key1 = cache.get_or_derive("test-secret").await.unwrap();
        let key2 = other.get_or_derive("test-secret").await.unwrap();

        // Same secret yields the same key across independent caches
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[tokio::test]
    async fn test_cached_key_matches_first_derivation() {
        let cache = KeyCache::new();

        let key1 = cache.get_or_derive("test-secret").await.unwrap();
        let key2 = cache.get_or_derive("test-secret").await.unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[tokio::test]
    async fn test_different_secrets_produce_different_keys() {
        let cache = KeyCache::new();

        let key1 = cache.get_or_derive("secret-one").await.unwrap();
        let key2 = cache.get_or_derive("secret-two").await.unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[tokio::test]
    async fn test_empty_secret_rejected() {
        let cache = KeyCache::new();

        let result = cache.get_or_derive("").await;
        assert!(matches!(result, Err(VaultError::MissingSecret)));
    }

    #[tokio::test]
    async fn test_concurrent_first_derivation() {
        let cache = std::sync::Arc::new(KeyCache::new());

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get_or_derive("shared-secret").await })
            })
            .collect();

        let mut keys = Vec::new();
        for task in tasks {
            keys.push(task.await.unwrap().unwrap());
        }

        // All racing callers see the same key bytes
        for key in &keys[1..] {
            assert_eq!(key.as_bytes(), keys[0].as_bytes());
        }
    }
}
