//! Error types for codex-crypto

use thiserror::Error;

/// Result type for codex-crypto operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by signing and verification primitives
#[derive(Debug, Error)]
pub enum Error {
    /// The signing primitive itself failed
    #[error("signing failed: {0}")]
    Signing(String),

    /// A signature did not verify against the canonical bytes
    #[error("signature verification failed: {0}")]
    Verification(String),

    /// A key identifier could not be decoded back into a verification key
    #[error("invalid key identifier: {0}")]
    InvalidKid(String),

    /// JSON handling of embedded key material failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Type-level canonical form error
    #[error(transparent)]
    Types(#[from] codex_types::Error),
}
