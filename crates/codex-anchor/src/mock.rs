//! Deterministic offline anchor provider

use crate::error::Result;
use crate::{AnchorProvider, AnchorRequest};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use codex_crypto::sha256;
use codex_types::Anchor;

/// Chain identifier reported by the mock provider
pub const MOCK_CHAIN: &str = "mock:local";

/// Offline anchor provider for testing and unauthenticated flows
///
/// Derives a pseudo-transaction id from the entry id and integrity token
/// using the same digest primitive as the rest of the pipeline. No network,
/// always succeeds, fully deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockAnchor;

#[async_trait]
impl AnchorProvider for MockAnchor {
    fn requires_credentials(&self) -> bool {
        false
    }

    async fn create(&self, request: &AnchorRequest, _token: Option<&str>) -> Result<Anchor> {
        let seed = format!("{}{}", request.entry_id, request.integrity_proof);
        let digest = sha256(seed.as_bytes());
        Ok(Anchor {
            chain: MOCK_CHAIN.to_string(),
            tx: URL_SAFE_NO_PAD.encode(digest.as_bytes()),
            hash_alg: "sha-256".to_string(),
            url: None,
            timestamp: None,
        })
    }
}
