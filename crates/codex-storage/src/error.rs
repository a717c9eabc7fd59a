//! Error types for codex-storage

use thiserror::Error;

/// Result type for codex-storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors produced by credential and blob storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// No bearer token is available
    #[error("no credential available")]
    MissingCredential,

    /// The remote service rejected the bearer token (expired or revoked)
    #[error("credential expired or rejected")]
    CredentialExpired,

    /// The remote service reported an error status
    #[error("storage service error {status}: {body}")]
    Service { status: u16, body: String },

    /// The stored object exists but is trashed
    #[error("object {0} is trashed")]
    Trashed(String),

    /// Network-level transport failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StorageError {
    /// Whether this failure should trigger the one-shot credential refresh
    pub fn is_credential(&self) -> bool {
        matches!(self, StorageError::CredentialExpired)
    }
}
