//! Storage backends for credential persistence
//!
//! This module provides two backends behind one trait:
//! 1. In-memory (tests and short-lived embeddings)
//! 2. JSON file (durable, atomic writes)

mod json_file;
mod memory;
mod traits;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::CredentialStore;
