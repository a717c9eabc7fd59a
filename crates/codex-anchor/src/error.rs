//! Error types for codex-anchor

use thiserror::Error;

/// Result type for codex-anchor operations
pub type Result<T> = std::result::Result<T, AnchorError>;

/// Errors produced while creating anchor proofs
///
/// Kept distinct from digest and validation errors so the orchestrator can
/// report exactly which phase failed.
#[derive(Debug, Error)]
pub enum AnchorError {
    /// The provider requires a bearer token and none was supplied
    #[error("anchor provider requires credentials")]
    MissingCredential,

    /// The anchoring service call failed
    #[error("anchor service error: {0}")]
    Storage(#[from] codex_storage::StorageError),

    /// The anchor descriptor could not be serialized
    #[error("anchor descriptor error: {0}")]
    Descriptor(#[from] serde_json::Error),
}
