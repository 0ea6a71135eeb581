//! Storage trait definitions

use async_trait::async_trait;
use uuid::Uuid;

use crate::credential::StoredCredential;
use crate::error::Result;

/// Trait for credential persistence backends.
///
/// Backends store envelopes verbatim; they never see plaintext secrets and
/// must not alter the hex strings in any way.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new credential record
    async fn insert(&self, record: StoredCredential) -> Result<()>;

    /// Fetch a record by id
    async fn get(&self, id: Uuid) -> Result<Option<StoredCredential>>;

    /// List all records owned by a user
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<StoredCredential>>;

    /// Replace an existing record; fails when the id is unknown
    async fn update(&self, record: StoredCredential) -> Result<()>;

    /// Remove a record; fails when the id is unknown
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}
