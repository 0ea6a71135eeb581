//! JSON file credential store
//!
//! Persists credential records to a JSON file in the user's data directory.
//! Secret fields arrive already sealed in their envelopes, so the file holds
//! metadata plus hex strings; the envelopes are written back verbatim.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::CredentialStore;
use crate::credential::StoredCredential;
use crate::error::{Result, VaultError};

/// File-backed credential store
pub struct JsonFileStore {
    /// Directory for the store file
    storage_dir: PathBuf,
    /// In-memory view of the file
    cache: RwLock<HashMap<Uuid, StoredCredential>>,
}

/// File format for persistent storage
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    records: HashMap<Uuid, StoredCredential>,
}

impl JsonFileStore {
    /// Create a store in the default data directory
    pub fn new() -> Result<Self> {
        let storage_dir = Self::default_storage_dir()?;
        Self::with_dir(storage_dir)
    }

    /// Create a store with a custom directory (for testing)
    pub fn with_dir(storage_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&storage_dir)?;

        debug!("Credential store initialized at: {:?}", storage_dir);

        Ok(Self {
            storage_dir,
            cache: RwLock::new(HashMap::new()),
        })
    }

    fn default_storage_dir() -> Result<PathBuf> {
        ProjectDirs::from("dev", "credential-vault", "vault")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                VaultError::StorageError("Could not determine data directory".to_string())
            })
    }

    fn store_file_path(&self) -> PathBuf {
        self.storage_dir.join("credentials.json")
    }

    /// Load records from disk
    pub async fn load(&self) -> Result<()> {
        let path = self.store_file_path();

        if !path.exists() {
            debug!("No existing store file found");
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&path).await?;
        let file: StoreFile = serde_json::from_str(&contents)?;

        let mut cache = self.cache.write().await;
        *cache = file.records;

        debug!("Loaded {} credential records", cache.len());
        Ok(())
    }

    /// Save records to disk
    async fn save(&self) -> Result<()> {
        let cache = self.cache.read().await;

        let file = StoreFile {
            version: 1,
            records: cache.clone(),
        };

        let contents = serde_json::to_string_pretty(&file)?;
        let path = self.store_file_path();

        // Write atomically using a temp file
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        debug!("Saved {} credential records", cache.len());
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for JsonFileStore {
    async fn insert(&self, record: StoredCredential) -> Result<()> {
        let id = record.credential.id;
        {
            let mut cache = self.cache.write().await;
            cache.insert(id, record);
        }
        self.save().await?;

        debug!("Stored credential: {}", id);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoredCredential>> {
        let cache = self.cache.read().await;
        Ok(cache.get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<StoredCredential>> {
        let cache = self.cache.read().await;
        Ok(cache
            .values()
            .filter(|r| r.credential.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, record: StoredCredential) -> Result<()> {
        let id = record.credential.id;
        {
            let mut cache = self.cache.write().await;
            if !cache.contains_key(&id) {
                return Err(VaultError::CredentialNotFound(id));
            }
            cache.insert(id, record);
        }
        self.save().await?;

        debug!("Updated credential: {}", id);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        {
            let mut cache = self.cache.write().await;
            if cache.remove(&id).is_none() {
                return Err(VaultError::CredentialNotFound(id));
            }
        }
        self.save().await?;

        debug!("Deleted credential: {}", id);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "JSON File Store"
    }
}
