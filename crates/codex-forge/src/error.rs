//! Pipeline errors, tagged by phase

use codex_entry::ValidationIssue;
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// The pipeline phase in which a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    UploadPayload,
    ComputeIntegrity,
    Anchor,
    Assemble,
    Sign,
    UploadEntry,
    SelfReference,
    Validate,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::UploadPayload => "upload-payload",
            Phase::ComputeIntegrity => "compute-integrity",
            Phase::Anchor => "anchor",
            Phase::Assemble => "assemble",
            Phase::Sign => "sign",
            Phase::UploadEntry => "upload-entry",
            Phase::SelfReference => "self-reference",
            Phase::Validate => "validate",
        };
        f.write_str(name)
    }
}

/// A terminal pipeline failure
///
/// Every variant identifies the phase that failed and carries the
/// underlying cause, so the caller can render a precise message. No partial
/// entry is ever returned alongside one of these.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Chunked delivery left a gap; reassembly refuses to proceed
    #[error("missing chunk {index} (expected {expected} contiguous chunks)")]
    ChunkGap { index: usize, expected: usize },

    /// Payload upload failed (after the one-shot credential retry)
    #[error("payload upload failed: {0}")]
    UploadPayload(#[source] codex_storage::StorageError),

    /// Digest computation or integrity encoding failed
    #[error("integrity computation failed: {0}")]
    Integrity(#[source] codex_types::Error),

    /// Anchor creation failed
    #[error("anchor creation failed: {0}")]
    Anchor(#[source] codex_anchor::AnchorError),

    /// Canonicalization or signing failed
    #[error("signing failed: {0}")]
    Sign(#[source] codex_entry::Error),

    /// Serializing the finished entry for upload failed
    #[error("entry serialization failed: {0}")]
    Serialize(#[source] codex_types::Error),

    /// Entry upload failed
    #[error("entry upload failed: {0}")]
    UploadEntry(#[source] codex_storage::StorageError),

    /// The self-referential re-upload failed
    #[error("self-reference update failed: {0}")]
    SelfReference(#[source] codex_storage::StorageError),

    /// The finished entry failed schema validation
    #[error("entry failed schema validation ({} issues)", .0.len())]
    Validation(Vec<ValidationIssue>),
}

impl BuildError {
    /// The phase this error is tagged with
    pub fn phase(&self) -> Phase {
        match self {
            BuildError::ChunkGap { .. } => Phase::ComputeIntegrity,
            BuildError::UploadPayload(_) => Phase::UploadPayload,
            BuildError::Integrity(_) => Phase::ComputeIntegrity,
            BuildError::Anchor(_) => Phase::Anchor,
            BuildError::Sign(_) => Phase::Sign,
            BuildError::Serialize(_) => Phase::UploadEntry,
            BuildError::UploadEntry(_) => Phase::UploadEntry,
            BuildError::SelfReference(_) => Phase::SelfReference,
            BuildError::Validation(_) => Phase::Validate,
        }
    }
}
