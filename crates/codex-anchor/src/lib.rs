//! Anchor providers for Codex entries
//!
//! An anchor binds an entry's integrity token to an external, timestamped,
//! independently verifiable proof. The provider is polymorphic: a
//! deterministic offline mock for testing and unauthenticated flows, and a
//! Drive-backed provider that uploads a small anchor descriptor to an
//! authenticated remote service as a timestamping surrogate.

pub mod drive;
pub mod error;
pub mod mock;

pub use drive::DriveAnchor;
pub use error::{AnchorError, Result};
pub use mock::MockAnchor;

use async_trait::async_trait;
use codex_types::{Anchor, IntegrityProof};
use uuid::Uuid;

/// The entry skeleton an anchor is created over
///
/// Carrying the integrity proof in the anchor payload ties the proof to the
/// exact artifact content, not just the entry id.
#[derive(Debug, Clone)]
pub struct AnchorRequest {
    /// The id of the entry being anchored
    pub entry_id: Uuid,
    /// Integrity token of the artifact the entry describes
    pub integrity_proof: IntegrityProof,
}

/// Creates external anchoring proofs
#[async_trait]
pub trait AnchorProvider: Send + Sync {
    /// Whether `create` needs a bearer token
    fn requires_credentials(&self) -> bool;

    /// Create an anchor proof for the given entry skeleton
    async fn create(&self, request: &AnchorRequest, token: Option<&str>) -> Result<Anchor>;
}
