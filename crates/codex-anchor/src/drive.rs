//! Drive-backed anchor provider
//!
//! Uploads a small anchor descriptor to an authenticated remote service and
//! treats the assigned object id as the transaction reference. The
//! descriptor carries the entry's integrity token, so the anchor is
//! verifiably tied to the exact artifact content.

use crate::error::{AnchorError, Result};
use crate::{AnchorProvider, AnchorRequest};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use codex_storage::BlobStore;
use codex_types::Anchor;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Chain identifier reported by the Drive provider
pub const DRIVE_CHAIN: &str = "google:drive";

/// Anchor descriptor persisted to the remote service
#[derive(Debug, Serialize)]
struct AnchorDescriptor<'a> {
    #[serde(rename = "codexId")]
    codex_id: String,
    timestamp: &'a str,
    integrity_proof: &'a str,
}

/// External-service anchor provider backed by a [`BlobStore`]
pub struct DriveAnchor {
    store: Arc<dyn BlobStore>,
}

impl DriveAnchor {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        DriveAnchor { store }
    }
}

#[async_trait]
impl AnchorProvider for DriveAnchor {
    fn requires_credentials(&self) -> bool {
        true
    }

    async fn create(&self, request: &AnchorRequest, token: Option<&str>) -> Result<Anchor> {
        let token = token.ok_or(AnchorError::MissingCredential)?;
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let descriptor = AnchorDescriptor {
            codex_id: request.entry_id.to_string(),
            timestamp: &timestamp,
            integrity_proof: request.integrity_proof.as_str(),
        };
        let bytes = serde_json::to_vec(&descriptor)?;
        let filename = format!("{}.anchor.json", request.entry_id);
        let stored = self
            .store
            .upload(&bytes, &filename, "application/json", token)
            .await?;
        info!(tx = %stored.id, "anchor descriptor uploaded");
        Ok(Anchor {
            chain: DRIVE_CHAIN.to_string(),
            tx: stored.id,
            hash_alg: "sha-256".to_string(),
            url: Some(stored.url),
            timestamp: Some(timestamp),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex_storage::{ObjectMetadata, StorageError, StoredObject};
    use codex_types::{IntegrityProof, Sha256Hash};
    use tokio::sync::Mutex;
    use uuid::Uuid;

    /// Records uploads and hands back canned references
    struct RecordingStore {
        uploads: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl BlobStore for RecordingStore {
        async fn upload(
            &self,
            bytes: &[u8],
            filename: &str,
            _mime_type: &str,
            _token: &str,
        ) -> codex_storage::Result<StoredObject> {
            self.uploads
                .lock()
                .await
                .push((filename.to_string(), bytes.to_vec()));
            Ok(StoredObject {
                id: "anchor-object-1".to_string(),
                url: "https://drive.google.com/file/d/anchor-object-1".to_string(),
            })
        }

        async fn exists(&self, _id: &str, _token: &str) -> codex_storage::Result<ObjectMetadata> {
            Err(StorageError::Service {
                status: 404,
                body: "not found".to_string(),
            })
        }

        async fn update(
            &self,
            _id: &str,
            _bytes: &[u8],
            _token: &str,
        ) -> codex_storage::Result<StoredObject> {
            Err(StorageError::Service {
                status: 405,
                body: "not supported".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_drive_anchor_uploads_descriptor() {
        let store = Arc::new(RecordingStore {
            uploads: Mutex::new(Vec::new()),
        });
        let anchor_provider = DriveAnchor::new(store.clone());
        let request = AnchorRequest {
            entry_id: Uuid::new_v4(),
            integrity_proof: IntegrityProof::from_sha256(&Sha256Hash::from_bytes([5u8; 32])),
        };

        let anchor = anchor_provider
            .create(&request, Some("token"))
            .await
            .unwrap();
        assert_eq!(anchor.chain, "google:drive");
        assert_eq!(anchor.tx, "anchor-object-1");
        assert!(anchor.url.is_some());
        assert!(anchor.timestamp.is_some());

        let uploads = store.uploads.lock().await;
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, format!("{}.anchor.json", request.entry_id));
        let descriptor: serde_json::Value = serde_json::from_slice(&uploads[0].1).unwrap();
        assert_eq!(
            descriptor["integrity_proof"],
            request.integrity_proof.as_str()
        );
        assert_eq!(descriptor["codexId"], request.entry_id.to_string());
    }

    #[tokio::test]
    async fn test_drive_anchor_requires_token() {
        let store = Arc::new(RecordingStore {
            uploads: Mutex::new(Vec::new()),
        });
        let anchor_provider = DriveAnchor::new(store);
        let request = AnchorRequest {
            entry_id: Uuid::new_v4(),
            integrity_proof: IntegrityProof::from_sha256(&Sha256Hash::from_bytes([5u8; 32])),
        };
        let result = anchor_provider.create(&request, None).await;
        assert!(matches!(result, Err(AnchorError::MissingCredential)));
    }
}
