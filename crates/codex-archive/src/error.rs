//! Packaging errors

use thiserror::Error;

/// Result type for packaging operations
pub type Result<T> = std::result::Result<T, PackagingError>;

#[derive(Debug, Error)]
pub enum PackagingError {
    /// The artifact needs a non-empty name inside the archive
    #[error("artifact name must not be empty")]
    EmptyArtifactName,

    /// AES encryption needs a non-empty password
    #[error("archive password must not be empty")]
    EmptyPassword,

    /// Serializing the entry to JSON failed
    #[error(transparent)]
    Serialization(#[from] codex_types::Error),

    /// Rewriting the redacted copy failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The zip container could not be written
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
