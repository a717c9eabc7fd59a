//! The entry construction pipeline

use crate::chunks::ChunkBuffer;
use crate::classify::{classify_text, content_kind, ContentKind, HeuristicClassifier, TextClassifier};
use crate::classify::BINARY_PROCESS_TAG;
use crate::error::{BuildError, Result};
use codex_anchor::{AnchorError, AnchorProvider, AnchorRequest, MockAnchor};
use codex_crypto::{sha256, EntrySigner};
use codex_entry::{rewrite_location, sign_entry, validate_entry, EntryDraft};
use codex_storage::{
    mime_for_filename, with_credential_refresh, BlobStore, CredentialStore, MemoryCredentialStore,
    StoredObject,
};
use codex_types::{Entry, IntegrityProof, StorageProtocol};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Artifact bytes, delivered whole or as indexed chunks
#[derive(Debug, Clone)]
pub enum Payload {
    Whole(Vec<u8>),
    Chunked(ChunkBuffer),
}

impl Payload {
    fn assemble(self) -> Result<Vec<u8>> {
        match self {
            Payload::Whole(bytes) => Ok(bytes),
            Payload::Chunked(buffer) => buffer.assemble(),
        }
    }
}

/// One entry-creation request
#[derive(Debug, Clone)]
pub struct ForgeRequest {
    /// The artifact content
    pub payload: Payload,
    /// Filename recorded as the entry's artifact and used for MIME
    /// selection and classification
    pub filename: String,
    /// Id of the entry this one supersedes, if any
    pub previous_id: Option<Uuid>,
    /// Rewrite `storage.location` to point at the uploaded entry document
    /// itself (remote storage only)
    pub self_reference: bool,
}

impl ForgeRequest {
    pub fn new(payload: Payload, filename: impl Into<String>) -> Self {
        ForgeRequest {
            payload,
            filename: filename.into(),
            previous_id: None,
            self_reference: false,
        }
    }

    /// Link the new entry to the one it supersedes
    pub fn previous(mut self, previous_id: Uuid) -> Self {
        self.previous_id = Some(previous_id);
        self
    }

    /// Request the self-referential location rewrite
    pub fn self_reference(mut self, yes: bool) -> Self {
        self.self_reference = yes;
        self
    }
}

/// Static pipeline settings
#[derive(Debug, Clone)]
pub struct ForgeConfig {
    /// Issuing organization recorded in every entry's identity block
    pub org: String,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        ForgeConfig {
            org: "Codex Forge".to_string(),
        }
    }
}

/// The result of a successful entry-creation run
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// The finished, signed, validated entry
    pub entry: Entry,
    /// Remote reference to the uploaded artifact, when storage is configured
    pub payload_ref: Option<StoredObject>,
    /// Remote reference to the uploaded entry document, when storage is
    /// configured
    pub entry_ref: Option<StoredObject>,
}

/// The entry construction pipeline
///
/// Holds the collaborators every run needs: the signer, the anchor
/// provider, optional remote blob storage, the shared credential store,
/// and a best-effort text classifier. Share a `Forge` behind an `Arc`
/// across concurrent tasks; runs share nothing but the credential store.
pub struct Forge {
    signer: EntrySigner,
    anchor: Arc<dyn AnchorProvider>,
    blobs: Option<Arc<dyn BlobStore>>,
    credentials: Arc<dyn CredentialStore>,
    classifier: Arc<dyn TextClassifier>,
    config: ForgeConfig,
}

impl Forge {
    /// Fully offline pipeline: mock anchor, no remote storage, ephemeral
    /// signing keys, heuristic classification
    pub fn local() -> Self {
        Forge {
            signer: EntrySigner::ephemeral(),
            anchor: Arc::new(MockAnchor),
            blobs: None,
            credentials: Arc::new(MemoryCredentialStore::new()),
            classifier: Arc::new(HeuristicClassifier),
            config: ForgeConfig::default(),
        }
    }

    /// Pipeline with remote blob storage and a chosen anchor provider
    pub fn remote(
        blobs: Arc<dyn BlobStore>,
        anchor: Arc<dyn AnchorProvider>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Forge {
            signer: EntrySigner::ephemeral(),
            anchor,
            blobs: Some(blobs),
            credentials,
            classifier: Arc::new(HeuristicClassifier),
            config: ForgeConfig::default(),
        }
    }

    /// Replace the signer (e.g. with a durable key)
    pub fn with_signer(mut self, signer: EntrySigner) -> Self {
        self.signer = signer;
        self
    }

    /// Replace the text classifier
    pub fn with_classifier(mut self, classifier: Arc<dyn TextClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_config(mut self, config: ForgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the full pipeline for one request
    ///
    /// Phases, in order: reassemble the payload, upload it (when remote
    /// storage is configured), compute the integrity token and classify
    /// the content, create the anchor, assemble and sign the entry,
    /// upload the entry document, optionally rewrite the location to
    /// self-reference and re-sign, and validate. Any phase failure aborts
    /// the run; by-products already persisted (an uploaded artifact, a
    /// created anchor) are left in place.
    pub async fn create_entry(&self, request: ForgeRequest) -> Result<BuildOutcome> {
        let ForgeRequest {
            payload,
            filename,
            previous_id,
            self_reference,
        } = request;

        let bytes = payload.assemble()?;
        debug!(filename = %filename, size = bytes.len(), "payload assembled");

        let payload_ref = match &self.blobs {
            Some(blobs) => Some(self.upload_payload(blobs.as_ref(), &bytes, &filename).await?),
            None => None,
        };

        let digest = sha256(&bytes);
        let integrity_proof = IntegrityProof::from_sha256(&digest);
        debug!(integrity_proof = %integrity_proof, "integrity token computed");

        let (process, subject) = self.classify(&bytes, &filename).await;

        let entry_id = Uuid::new_v4();
        let anchor = self
            .create_anchor(&AnchorRequest {
                entry_id,
                integrity_proof: integrity_proof.clone(),
            })
            .await?;
        debug!(chain = %anchor.chain, "anchor created");

        let (protocol, location) = match &payload_ref {
            Some(stored) => (StorageProtocol::Gdrive, Some(object_url(stored))),
            None => (StorageProtocol::Local, Some(filename.clone())),
        };

        let mut entry = EntryDraft::new(entry_id, integrity_proof, anchor)
            .identity(self.config.org.as_str(), process, filename.as_str())
            .subject(subject)
            .storage(protocol, location)
            .previous(previous_id)
            .build();

        sign_entry(&mut entry, &self.signer).map_err(BuildError::Sign)?;

        let mut entry_ref = None;
        if let Some(blobs) = &self.blobs {
            let stored = self.upload_entry(blobs.as_ref(), &entry).await?;
            if self_reference {
                self.apply_self_reference(blobs.as_ref(), &mut entry, &stored)
                    .await?;
            }
            entry_ref = Some(stored);
        }

        let report = validate_entry(&entry);
        if !report.is_valid() {
            return Err(BuildError::Validation(report.issues));
        }

        info!(entry_id = %entry.id, "entry created");
        Ok(BuildOutcome {
            entry,
            payload_ref,
            entry_ref,
        })
    }

    async fn upload_payload(
        &self,
        blobs: &dyn BlobStore,
        bytes: &[u8],
        filename: &str,
    ) -> Result<StoredObject> {
        let mime_type = mime_for_filename(filename);
        with_credential_refresh(self.credentials.as_ref(), |token| async move {
            blobs.upload(bytes, filename, mime_type, &token).await
        })
        .await
        .map_err(BuildError::UploadPayload)
    }

    async fn classify(&self, bytes: &[u8], filename: &str) -> (String, Option<String>) {
        let text = match content_kind(filename) {
            ContentKind::Text => std::str::from_utf8(bytes).ok(),
            ContentKind::Binary => None,
        };
        match text {
            Some(text) => {
                let (subject, tag) = classify_text(self.classifier.as_ref(), text).await;
                (tag, Some(subject))
            }
            // Undecodable or binary content gets the fixed process tag and
            // the filename as its subject.
            None => (BINARY_PROCESS_TAG.to_string(), Some(filename.to_string())),
        }
    }

    /// Credentialed providers get the same one-shot refresh-and-retry as
    /// uploads: on an expired token the credential is dropped, re-read, and
    /// the create runs once more.
    async fn create_anchor(&self, request: &AnchorRequest) -> Result<codex_types::Anchor> {
        if !self.anchor.requires_credentials() {
            return self
                .anchor
                .create(request, None)
                .await
                .map_err(BuildError::Anchor);
        }

        let token = self.require_token().await?;
        match self.anchor.create(request, Some(&token)).await {
            Err(AnchorError::Storage(e)) if e.is_credential() => {
                self.credentials
                    .remove()
                    .await
                    .map_err(|e| BuildError::Anchor(AnchorError::Storage(e)))?;
                let fresh = self.require_token().await?;
                self.anchor
                    .create(request, Some(&fresh))
                    .await
                    .map_err(BuildError::Anchor)
            }
            other => other.map_err(BuildError::Anchor),
        }
    }

    async fn require_token(&self) -> Result<String> {
        self.credentials
            .get()
            .await
            .map_err(|e| BuildError::Anchor(AnchorError::Storage(e)))?
            .ok_or(BuildError::Anchor(AnchorError::MissingCredential))
    }

    async fn upload_entry(&self, blobs: &dyn BlobStore, entry: &Entry) -> Result<StoredObject> {
        let json = entry.to_json_pretty().map_err(BuildError::Serialize)?;
        let entry_name = format!("{}.codex.json", entry.id);
        with_credential_refresh(self.credentials.as_ref(), |token| {
            let json = json.clone();
            let entry_name = entry_name.clone();
            async move {
                blobs
                    .upload(json.as_bytes(), &entry_name, "application/json", &token)
                    .await
            }
        })
        .await
        .map_err(BuildError::UploadEntry)
    }

    /// Point `storage.location` at the uploaded entry document, re-sign,
    /// and replace the remote copy in place
    async fn apply_self_reference(
        &self,
        blobs: &dyn BlobStore,
        entry: &mut Entry,
        stored: &StoredObject,
    ) -> Result<()> {
        rewrite_location(entry, object_url(stored));
        sign_entry(entry, &self.signer).map_err(BuildError::Sign)?;
        let json = entry.to_json_pretty().map_err(BuildError::Serialize)?;
        with_credential_refresh(self.credentials.as_ref(), |token| {
            let json = json.clone();
            async move { blobs.update(&stored.id, json.as_bytes(), &token).await }
        })
        .await
        .map_err(BuildError::SelfReference)?;
        debug!(entry_id = %entry.id, "self-reference applied");
        Ok(())
    }
}

/// Fetchable URL for a stored object, falling back to the canonical Drive
/// file URL when the provider returned none
fn object_url(stored: &StoredObject) -> String {
    if stored.url.is_empty() {
        format!("https://drive.google.com/file/d/{}", stored.id)
    } else {
        stored.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_prefers_provider_link() {
        let stored = StoredObject {
            id: "abc".to_string(),
            url: "https://example.com/abc".to_string(),
        };
        assert_eq!(object_url(&stored), "https://example.com/abc");
    }

    #[test]
    fn test_object_url_falls_back_to_drive_form() {
        let stored = StoredObject {
            id: "abc".to_string(),
            url: String::new(),
        };
        assert_eq!(object_url(&stored), "https://drive.google.com/file/d/abc");
    }
}
