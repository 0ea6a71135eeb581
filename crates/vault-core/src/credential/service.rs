//! Credential service for CRUD operations
//!
//! Sits between callers and the storage backend: every sensitive field is
//! sealed through the [`FieldCipher`] on the way in and opened on the way
//! out. The password is always encrypted; the note only when present and
//! non-blank. Cryptographic failures propagate - no operation falls back to
//! an unencrypted path or substitutes empty plaintext.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::types::{Credential, CredentialInput, DecryptedCredential, StoredCredential};
use crate::config::EncryptionSecret;
use crate::crypto::{EncryptedField, FieldCipher, KeyCache};
use crate::error::{Result, VaultError};
use crate::storage::CredentialStore;

/// Credential service
pub struct CredentialService {
    /// Storage backend
    store: Arc<dyn CredentialStore>,
    /// Field cipher with its key cache
    cipher: FieldCipher,
    /// Secret all field keys derive from
    secret: EncryptionSecret,
}

impl CredentialService {
    /// Create a service over a storage backend
    pub fn new(store: Arc<dyn CredentialStore>, secret: EncryptionSecret) -> Self {
        Self {
            store,
            cipher: FieldCipher::new(),
            secret,
        }
    }

    /// Create a service sharing an existing key cache
    pub fn with_key_cache(
        store: Arc<dyn CredentialStore>,
        secret: EncryptionSecret,
        keys: Arc<KeyCache>,
    ) -> Self {
        Self {
            store,
            cipher: FieldCipher::with_key_cache(keys),
            secret,
        }
    }

    /// Create a new credential for a user
    pub async fn create(&self, user_id: Uuid, input: CredentialInput) -> Result<Credential> {
        let input = input.normalized();
        let credential = Credential::new(user_id, &input);

        let (password, note) = self.encrypt_fields(&input).await?;

        let stored = StoredCredential {
            credential: credential.clone(),
            password,
            note,
        };
        self.store.insert(stored).await?;

        info!("Created credential: {} ({})", credential.name, credential.id);
        Ok(credential)
    }

    /// Get and decrypt a credential owned by `user_id`
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<DecryptedCredential> {
        let stored = self.fetch_owned(user_id, id).await?;
        let decrypted = self.decrypt_record(stored).await?;

        debug!("Decrypted credential: {}", id);
        Ok(decrypted)
    }

    /// List and decrypt all credentials owned by `user_id`
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<DecryptedCredential>> {
        let records = self.store.list_by_user(user_id).await?;

        let mut credentials = Vec::with_capacity(records.len());
        for record in records {
            credentials.push(self.decrypt_record(record).await?);
        }

        debug!("Listed {} credentials for user", credentials.len());
        Ok(credentials)
    }

    /// Rewrite a credential with new field values.
    ///
    /// The whole record is re-encrypted and replaced, so clearing the note
    /// drops its entire envelope - stale iv/authTag never outlive their
    /// ciphertext.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: CredentialInput,
    ) -> Result<Credential> {
        let existing = self.fetch_owned(user_id, id).await?;
        let input = input.normalized();

        let credential = Credential {
            id,
            url: input.url.clone(),
            name: input.name.clone(),
            username: input.username.clone(),
            alternative_username: input.alternative_username.clone(),
            user_id,
            created_at: existing.credential.created_at,
            updated_at: chrono::Utc::now(),
        };

        let (password, note) = self.encrypt_fields(&input).await?;

        let stored = StoredCredential {
            credential: credential.clone(),
            password,
            note,
        };
        self.store.update(stored).await?;

        info!("Updated credential: {}", id);
        Ok(credential)
    }

    /// Delete a credential owned by `user_id`
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.fetch_owned(user_id, id).await?;
        self.store.delete(id).await?;

        info!("Deleted credential: {}", id);
        Ok(())
    }

    /// Encrypt the sensitive fields of a normalized input.
    ///
    /// The password envelope is mandatory; a note envelope exists only when
    /// the input carries a note.
    async fn encrypt_fields(
        &self,
        input: &CredentialInput,
    ) -> Result<(EncryptedField, Option<EncryptedField>)> {
        let secret = self.secret.expose();

        let password = self.cipher.encrypt(&input.password, secret).await?;
        let note = match &input.note {
            Some(note) => Some(self.cipher.encrypt(note, secret).await?),
            None => None,
        };

        Ok((password, note))
    }

    /// Decrypt a stored record into its plaintext view.
    ///
    /// An absent note stays absent - no decryption is attempted and no
    /// empty string is fabricated.
    async fn decrypt_record(&self, stored: StoredCredential) -> Result<DecryptedCredential> {
        let secret = self.secret.expose();

        let password = self.cipher.decrypt(secret, &stored.password).await?;
        let note = match &stored.note {
            Some(envelope) => Some(self.cipher.decrypt(secret, envelope).await?),
            None => None,
        };

        Ok(DecryptedCredential::new(stored.credential, password, note))
    }

    /// Fetch a record, treating other users' records as not found
    async fn fetch_owned(&self, user_id: Uuid, id: Uuid) -> Result<StoredCredential> {
        let stored = self
            .store
            .get(id)
            .await?
            .ok_or(VaultError::CredentialNotFound(id))?;

        if stored.credential.user_id != user_id {
            return Err(VaultError::CredentialNotFound(id));
        }

        Ok(stored)
    }
}
