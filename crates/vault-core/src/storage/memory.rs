//! In-memory credential store
//!
//! Useful for tests and short-lived embeddings; nothing survives the
//! process.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::CredentialStore;
use crate::credential::StoredCredential;
use crate::error::{Result, VaultError};

/// Process-local credential store
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, StoredCredential>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert(&self, record: StoredCredential) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(record.credential.id, record);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoredCredential>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<StoredCredential>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.credential.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, record: StoredCredential) -> Result<()> {
        let mut records = self.records.write().await;
        let id = record.credential.id;
        if !records.contains_key(&id) {
            return Err(VaultError::CredentialNotFound(id));
        }
        records.insert(id, record);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut records = self.records.write().await;
        if records.remove(&id).is_none() {
            return Err(VaultError::CredentialNotFound(id));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "In-Memory Store"
    }
}
