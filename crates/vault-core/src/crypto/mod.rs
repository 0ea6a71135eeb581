//! Cryptographic primitives for credential field encryption
//!
//! This module provides:
//! - AES-256-GCM authenticated field encryption
//! - scrypt key derivation with per-secret caching
//! - Secure memory handling with zeroize

mod cipher;
mod key_cache;
mod secure_memory;

pub use cipher::{EncryptedField, FieldCipher};
pub use key_cache::KeyCache;
pub use secure_memory::DerivedKey;
