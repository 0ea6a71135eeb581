//! Credential type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::EncryptedField;

/// Credential metadata (safe to display and log)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Unique identifier
    pub id: Uuid,

    /// Site or service URL
    pub url: String,

    /// User-friendly name
    pub name: String,

    /// Login username
    pub username: String,

    /// Optional alternate username (e.g., email vs. handle)
    pub alternative_username: Option<String>,

    /// Owning user
    pub user_id: Uuid,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Last modified timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating a credential.
///
/// Carries plaintext secrets; `Debug` redacts them.
#[derive(Clone)]
pub struct CredentialInput {
    pub url: String,
    pub name: String,
    pub username: String,
    pub alternative_username: Option<String>,
    pub password: String,
    pub note: Option<String>,
}

impl CredentialInput {
    /// Normalize blank optional fields to `None`.
    ///
    /// A whitespace-only alternate username or note is treated as absent,
    /// matching how the write paths decide whether to encrypt a note at all.
    pub fn normalized(mut self) -> Self {
        self.alternative_username = self
            .alternative_username
            .filter(|s| !s.trim().is_empty());
        self.note = self.note.filter(|s| !s.trim().is_empty());
        self
    }
}

impl std::fmt::Debug for CredentialInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialInput")
            .field("url", &self.url)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("alternative_username", &self.alternative_username)
            .field("password", &"[REDACTED]")
            .field("note", &self.note.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Stored credential (secrets encrypted)
///
/// The password always carries an envelope; the note carries one only when
/// a non-blank note was supplied. `Option<EncryptedField>` makes "all three
/// envelope components present or all absent" structural.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    /// Credential metadata
    pub credential: Credential,

    /// Encrypted password envelope
    pub password: EncryptedField,

    /// Encrypted note envelope, when a note exists
    pub note: Option<EncryptedField>,
}

/// Decrypted credential view - secret fields zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DecryptedCredential {
    /// Credential metadata
    #[zeroize(skip)]
    pub credential: Credential,
    /// Decrypted password
    password: String,
    /// Decrypted note, when one exists
    note: Option<String>,
}

impl DecryptedCredential {
    /// Assemble a decrypted view
    pub fn new(credential: Credential, password: String, note: Option<String>) -> Self {
        Self {
            credential,
            password,
            note,
        }
    }

    /// Get the password (use carefully)
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Get the note, absent when none was stored
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

impl std::fmt::Debug for DecryptedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptedCredential")
            .field("credential", &self.credential)
            .field("password", &"[REDACTED]")
            .field("note", &self.note.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Credential {
    /// Create metadata for a new credential owned by `user_id`
    pub fn new(user_id: Uuid, input: &CredentialInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            url: input.url.clone(),
            name: input.name.clone(),
            username: input.username.clone(),
            alternative_username: input.alternative_username.clone(),
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}
