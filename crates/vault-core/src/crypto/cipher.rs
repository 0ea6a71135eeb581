//! AES-256-GCM field encryption
//!
//! Each sensitive field is sealed into a three-part envelope of hex strings:
//! - `ciphertext`: same byte length as the plaintext (GCM adds no padding)
//! - `iv`: 12 bytes (96 bits), random per encryption call
//! - `auth_tag`: 16 bytes (128 bits), verified on decrypt
//!
//! Losing any one component makes the field permanently undecryptable, so
//! the three travel together and are stored together.

use std::sync::Arc;

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::KeyCache;
use crate::error::{Result, VaultError};

/// IV length for GCM (96 bits)
const IV_LEN: usize = 12;
/// Authentication tag length (128 bits)
const TAG_LEN: usize = 16;

/// One encrypted field: ciphertext, IV, and auth tag, each hex-encoded.
///
/// Serializes with camelCase names (`authTag`) to match the stored row
/// layout. Storage must preserve these strings byte-exact; any transcoding
/// breaks decryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedField {
    /// Hex-encoded ciphertext, variable length
    pub ciphertext: String,
    /// Hex-encoded 12-byte initialization vector
    pub iv: String,
    /// Hex-encoded 16-byte authentication tag
    pub auth_tag: String,
}

/// Encrypts and decrypts individual credential fields.
///
/// Stateless apart from the shared [`KeyCache`]; concurrent calls are
/// independent.
pub struct FieldCipher {
    keys: Arc<KeyCache>,
}

impl FieldCipher {
    /// Create a cipher with a fresh key cache
    pub fn new() -> Self {
        Self {
            keys: Arc::new(KeyCache::new()),
        }
    }

    /// Create a cipher over an existing key cache
    pub fn with_key_cache(keys: Arc<KeyCache>) -> Self {
        Self { keys }
    }

    /// Encrypt a plaintext field under the given secret.
    ///
    /// A fresh random IV is generated per call; encrypting the same
    /// plaintext twice yields different envelopes.
    pub async fn encrypt(&self, plaintext: &str, secret: &str) -> Result<EncryptedField> {
        let key = self.keys.get_or_derive(secret).await?;
        let cipher = Aes256Gcm::new(key.as_bytes().into());

        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);
        let nonce = Nonce::from_slice(&iv);

        // aes-gcm appends the auth tag to the ciphertext
        let ciphertext_with_tag = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| VaultError::EncryptionError(e.to_string()))?;

        if ciphertext_with_tag.len() < TAG_LEN {
            return Err(VaultError::EncryptionError(
                "Ciphertext too short".to_string(),
            ));
        }

        let tag_start = ciphertext_with_tag.len() - TAG_LEN;

        Ok(EncryptedField {
            ciphertext: hex::encode(&ciphertext_with_tag[..tag_start]),
            iv: hex::encode(iv),
            auth_tag: hex::encode(&ciphertext_with_tag[tag_start..]),
        })
    }

    /// Decrypt an envelope back to its plaintext.
    ///
    /// Fails with [`VaultError::MalformedEnvelope`] when a component is not
    /// valid hex or has the wrong length, and with
    /// [`VaultError::AuthenticationFailed`] when the tag does not verify
    /// (wrong secret, or any component altered or swapped between records).
    /// Corrupted plaintext is never returned.
    pub async fn decrypt(&self, secret: &str, envelope: &EncryptedField) -> Result<String> {
        let key = self.keys.get_or_derive(secret).await?;

        let iv = decode_component(&envelope.iv, "iv")?;
        let auth_tag = decode_component(&envelope.auth_tag, "authTag")?;
        let ciphertext = decode_component(&envelope.ciphertext, "ciphertext")?;

        if iv.len() != IV_LEN {
            return Err(VaultError::MalformedEnvelope(format!(
                "Invalid iv length: expected {}, got {}",
                IV_LEN,
                iv.len()
            )));
        }
        if auth_tag.len() != TAG_LEN {
            return Err(VaultError::MalformedEnvelope(format!(
                "Invalid authTag length: expected {}, got {}",
                TAG_LEN,
                auth_tag.len()
            )));
        }

        let cipher = Aes256Gcm::new(key.as_bytes().into());
        let nonce = Nonce::from_slice(&iv);

        // Reconstruct ciphertext with the tag appended, as aes-gcm expects
        let mut ciphertext_with_tag = ciphertext;
        ciphertext_with_tag.extend_from_slice(&auth_tag);

        let plaintext = cipher
            .decrypt(nonce, ciphertext_with_tag.as_slice())
            .map_err(|_| VaultError::AuthenticationFailed)?;

        String::from_utf8(plaintext)
            .map_err(|_| VaultError::MalformedEnvelope("Plaintext is not valid UTF-8".to_string()))
    }
}

impl Default for FieldCipher {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_component(hex_str: &str, name: &str) -> Result<Vec<u8>> {
    hex::decode(hex_str)
        .map_err(|e| VaultError::MalformedEnvelope(format!("Invalid {} hex: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-value";

    /// Flip the first hex character of a component to a different hex digit
    fn flip_first_hex_char(s: &str) -> String {
        let mut chars: Vec<char> = s.chars().collect();
        chars[0] = if chars[0] == 'a' { 'b' } else { 'a' };
        chars.into_iter().collect()
    }

    #[tokio::test]
    async fn test_encrypt_decrypt_roundtrip() {
        let cipher = FieldCipher::new();
        let plaintext = "Hello, World!";

        let envelope = cipher.encrypt(plaintext, SECRET).await.unwrap();
        let decrypted = cipher.decrypt(SECRET, &envelope).await.unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[tokio::test]
    async fn test_roundtrip_empty_string() {
        let cipher = FieldCipher::new();

        let envelope = cipher.encrypt("", SECRET).await.unwrap();
        assert_eq!(envelope.ciphertext, "");

        let decrypted = cipher.decrypt(SECRET, &envelope).await.unwrap();
        assert_eq!(decrypted, "");
    }

    #[tokio::test]
    async fn test_roundtrip_unicode() {
        let cipher = FieldCipher::new();
        let plaintext = "pässwörd-日本語-🔐";

        let envelope = cipher.encrypt(plaintext, SECRET).await.unwrap();
        let decrypted = cipher.decrypt(SECRET, &envelope).await.unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[tokio::test]
    async fn test_roundtrip_multi_kilobyte() {
        let cipher = FieldCipher::new();
        let plaintext = "long note ".repeat(500); // 5000 bytes

        let envelope = cipher.encrypt(&plaintext, SECRET).await.unwrap();
        let decrypted = cipher.decrypt(SECRET, &envelope).await.unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[tokio::test]
    async fn test_envelope_component_lengths() {
        let cipher = FieldCipher::new();
        // 11 plaintext bytes -> 22 hex chars of ciphertext (GCM, no padding)
        let envelope = cipher.encrypt("P@ssw0rd!23", SECRET).await.unwrap();

        assert_eq!(envelope.iv.len(), 24);
        assert_eq!(envelope.auth_tag.len(), 32);
        assert_eq!(envelope.ciphertext.len(), 22);

        let decrypted = cipher.decrypt(SECRET, &envelope).await.unwrap();
        assert_eq!(decrypted, "P@ssw0rd!23");
    }

    #[tokio::test]
    async fn test_fresh_iv_per_call() {
        let cipher = FieldCipher::new();

        let envelope1 = cipher.encrypt("same plaintext", SECRET).await.unwrap();
        let envelope2 = cipher.encrypt("same plaintext", SECRET).await.unwrap();

        assert_ne!(envelope1.iv, envelope2.iv);
        assert_ne!(envelope1.ciphertext, envelope2.ciphertext);
    }

    #[tokio::test]
    async fn test_wrong_secret_fails() {
        let cipher = FieldCipher::new();

        let envelope = cipher.encrypt("secret data", SECRET).await.unwrap();
        let result = cipher.decrypt("some-other-secret", &envelope).await;

        assert!(matches!(result, Err(VaultError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn test_tampered_ciphertext_fails() {
        let cipher = FieldCipher::new();

        let mut envelope = cipher.encrypt("secret data", SECRET).await.unwrap();
        envelope.ciphertext = flip_first_hex_char(&envelope.ciphertext);

        let result = cipher.decrypt(SECRET, &envelope).await;
        assert!(matches!(result, Err(VaultError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn test_tampered_iv_fails() {
        let cipher = FieldCipher::new();

        let mut envelope = cipher.encrypt("secret data", SECRET).await.unwrap();
        envelope.iv = flip_first_hex_char(&envelope.iv);

        let result = cipher.decrypt(SECRET, &envelope).await;
        assert!(matches!(result, Err(VaultError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn test_tampered_auth_tag_fails() {
        let cipher = FieldCipher::new();

        let mut envelope = cipher.encrypt("secret data", SECRET).await.unwrap();
        envelope.auth_tag = flip_first_hex_char(&envelope.auth_tag);

        let result = cipher.decrypt(SECRET, &envelope).await;
        assert!(matches!(result, Err(VaultError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn test_cross_record_substitution_fails() {
        let cipher = FieldCipher::new();

        let envelope1 = cipher.encrypt("password one", SECRET).await.unwrap();
        let envelope2 = cipher.encrypt("password two", SECRET).await.unwrap();

        // Mix components from two valid envelopes
        let mixed = EncryptedField {
            ciphertext: envelope1.ciphertext,
            iv: envelope2.iv,
            auth_tag: envelope1.auth_tag,
        };

        let result = cipher.decrypt(SECRET, &mixed).await;
        assert!(matches!(result, Err(VaultError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn test_malformed_hex_rejected() {
        let cipher = FieldCipher::new();

        let mut envelope = cipher.encrypt("data", SECRET).await.unwrap();
        envelope.iv = "not-hex!".to_string();

        let result = cipher.decrypt(SECRET, &envelope).await;
        assert!(matches!(result, Err(VaultError::MalformedEnvelope(_))));
    }

    #[tokio::test]
    async fn test_wrong_iv_length_rejected() {
        let cipher = FieldCipher::new();

        let mut envelope = cipher.encrypt("data", SECRET).await.unwrap();
        envelope.iv = "abcdef".to_string(); // valid hex, 3 bytes

        let result = cipher.decrypt(SECRET, &envelope).await;
        assert!(matches!(result, Err(VaultError::MalformedEnvelope(_))));
    }

    #[tokio::test]
    async fn test_empty_secret_rejected() {
        let cipher = FieldCipher::new();

        let result = cipher.encrypt("data", "").await;
        assert!(matches!(result, Err(VaultError::MissingSecret)));
    }

    #[tokio::test]
    async fn test_envelope_serde_uses_camel_case() {
        let envelope = EncryptedField {
            ciphertext: "aabb".to_string(),
            iv: "00112233445566778899aabb".to_string(),
            auth_tag: "00112233445566778899aabbccddeeff".to_string(),
        };

        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains("\"authTag\""));

        let parsed: EncryptedField = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, envelope);
    }
}
