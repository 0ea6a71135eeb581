//! Credential management with envelope encryption at rest

mod service;
mod types;

pub use service::CredentialService;
pub use types::*;
