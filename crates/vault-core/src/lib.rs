//! # vault-core
//!
//! Core vault functionality for Credential Vault including:
//! - AES-256-GCM envelope encryption of credential fields
//! - scrypt key derivation with per-secret process caching
//! - Credential CRUD with per-user scoping
//! - Password generation with OS randomness

pub mod config;
pub mod credential;
pub mod crypto;
pub mod error;
pub mod generator;
pub mod storage;

pub use config::{EncryptionSecret, ENCRYPTION_SECRET_ENV};
pub use credential::{
    Credential, CredentialInput, CredentialService, DecryptedCredential, StoredCredential,
};
pub use crypto::{DerivedKey, EncryptedField, FieldCipher, KeyCache};
pub use error::{Result, VaultError};
pub use generator::{
    estimate_strength, generate_password, validate_options, PasswordOptions, PasswordStrength,
    StrengthEstimate,
};
pub use storage::{CredentialStore, JsonFileStore, MemoryStore};
