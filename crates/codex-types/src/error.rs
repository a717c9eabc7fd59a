//! Error types for codex-types

use thiserror::Error;

/// Result type for codex-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while working with entry types and encodings
#[derive(Debug, Error)]
pub enum Error {
    /// JSON serialization or deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An integrity token did not match the `ni:///<alg>;<base64url>` shape
    #[error("invalid integrity proof: {0}")]
    InvalidIntegrityProof(String),

    /// A hash algorithm token was not recognized
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A hex-encoded digest could not be decoded
    #[error("invalid hex digest: {0}")]
    InvalidHex(String),

    /// A storage protocol token was outside the closed set
    #[error("unknown storage protocol: {0}")]
    UnknownProtocol(String),
}
