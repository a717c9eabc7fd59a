//! Unsigned entry assembly and signature operations

use crate::error::Result;
use codex_crypto::EntrySigner;
use codex_types::{
    Anchor, Entry, Identity, IntegrityProof, Storage, StorageProtocol, ENTRY_VERSION,
};
use uuid::Uuid;

/// Builder for an unsigned entry
///
/// Collects the pieces the pipeline produces and assembles an [`Entry`]
/// with an empty signature list and the fixed protocol version.
///
/// # Example
///
/// ```
/// use codex_entry::EntryDraft;
/// use codex_types::{IntegrityProof, Sha256Hash, StorageProtocol, Anchor};
/// use uuid::Uuid;
///
/// let proof = IntegrityProof::from_sha256(&Sha256Hash::from_bytes([0u8; 32]));
/// let anchor = Anchor {
///     chain: "mock:local".to_string(),
///     tx: "tx".to_string(),
///     hash_alg: "sha-256".to_string(),
///     url: None,
///     timestamp: None,
/// };
/// let entry = EntryDraft::new(Uuid::new_v4(), proof, anchor)
///     .identity("Codex Forge", "File-Upload-Hashed", "report.txt")
///     .storage(StorageProtocol::Local, Some("report.txt".to_string()))
///     .build();
/// assert!(entry.signatures.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct EntryDraft {
    id: Uuid,
    integrity_proof: IntegrityProof,
    anchor: Anchor,
    org: String,
    process: String,
    artifact: String,
    subject: Option<String>,
    protocol: StorageProtocol,
    location: Option<String>,
    previous_id: Option<Uuid>,
}

impl EntryDraft {
    /// Start a draft from the pieces every entry must have
    pub fn new(id: Uuid, integrity_proof: IntegrityProof, anchor: Anchor) -> Self {
        EntryDraft {
            id,
            integrity_proof,
            anchor,
            org: String::new(),
            process: String::new(),
            artifact: String::new(),
            subject: None,
            protocol: StorageProtocol::Local,
            location: None,
            previous_id: None,
        }
    }

    /// Set the descriptive identity fields
    pub fn identity(
        mut self,
        org: impl Into<String>,
        process: impl Into<String>,
        artifact: impl Into<String>,
    ) -> Self {
        self.org = org.into();
        self.process = process.into();
        self.artifact = artifact.into();
        self
    }

    /// Set the optional human-readable subject
    pub fn subject(mut self, subject: Option<String>) -> Self {
        self.subject = subject;
        self
    }

    /// Set the storage protocol and advisory location
    pub fn storage(mut self, protocol: StorageProtocol, location: Option<String>) -> Self {
        self.protocol = protocol;
        self.location = location;
        self
    }

    /// Link this entry to the one it supersedes
    pub fn previous(mut self, previous_id: Option<Uuid>) -> Self {
        self.previous_id = previous_id;
        self
    }

    /// Assemble the unsigned entry (`signatures: []`)
    pub fn build(self) -> Entry {
        Entry {
            id: self.id,
            version: ENTRY_VERSION.to_string(),
            storage: Storage {
                protocol: self.protocol,
                location: self.location,
                integrity_proof: self.integrity_proof,
                encryption: None,
            },
            identity: Identity {
                org: self.org,
                process: self.process,
                artifact: self.artifact,
                subject: self.subject,
            },
            anchor: self.anchor,
            signatures: vec![],
            previous_id: self.previous_id,
        }
    }
}

/// Canonicalize the entry's unsigned view, sign it, and append the result
///
/// The signature covers the canonical form with `signatures` entirely
/// excluded, so every signature in the list is an independent co-signature
/// over the same unsigned skeleton. Taking `&mut Entry` serializes
/// signature operations per entry: two cannot interleave.
pub fn sign_entry(entry: &mut Entry, signer: &EntrySigner) -> Result<()> {
    let canonical = entry.canonical_unsigned()?;
    let signature = signer.sign(&canonical)?;
    entry.signatures.push(signature);
    Ok(())
}

/// Rewrite the advisory storage location, discarding all signatures
///
/// A location rewrite invalidates every prior signature, so the signature
/// list is cleared unconditionally; the entry must be re-signed before
/// further use. This is the only sanctioned mutation of a built entry.
pub fn rewrite_location(entry: &mut Entry, location: impl Into<String>) {
    entry.storage.location = Some(location.into());
    entry.signatures.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex_crypto::verify_entry_signature;
    use codex_types::Sha256Hash;

    fn draft() -> EntryDraft {
        let proof = IntegrityProof::from_sha256(&Sha256Hash::from_bytes([2u8; 32]));
        let anchor = Anchor {
            chain: "mock:local".to_string(),
            tx: "tx".to_string(),
            hash_alg: "sha-256".to_string(),
            url: None,
            timestamp: None,
        };
        EntryDraft::new(Uuid::new_v4(), proof, anchor)
            .identity("Codex Forge", "File-Upload-Hashed", "notes.txt")
            .storage(StorageProtocol::Local, Some("notes.txt".to_string()))
    }

    #[test]
    fn test_draft_builds_unsigned_entry() {
        let entry = draft().build();
        assert_eq!(entry.version, ENTRY_VERSION);
        assert!(entry.signatures.is_empty());
        assert_eq!(entry.identity.org, "Codex Forge");
        assert_eq!(entry.previous_id, None);
    }

    #[test]
    fn test_sign_appends_verifiable_signature() {
        let mut entry = draft().build();
        let signer = EntrySigner::ephemeral();
        sign_entry(&mut entry, &signer).unwrap();
        assert_eq!(entry.signatures.len(), 1);
        let canonical = entry.canonical_unsigned().unwrap();
        verify_entry_signature(&entry.signatures[0], &canonical).unwrap();
    }

    #[test]
    fn test_cosignatures_cover_same_skeleton() {
        let mut entry = draft().build();
        let signer = EntrySigner::ephemeral();
        sign_entry(&mut entry, &signer).unwrap();
        sign_entry(&mut entry, &signer).unwrap();
        assert_eq!(entry.signatures.len(), 2);
        // Both verify against the same unsigned canonical form.
        let canonical = entry.canonical_unsigned().unwrap();
        verify_entry_signature(&entry.signatures[0], &canonical).unwrap();
        verify_entry_signature(&entry.signatures[1], &canonical).unwrap();
    }

    #[test]
    fn test_rewrite_location_resets_signatures() {
        let mut entry = draft().build();
        let signer = EntrySigner::ephemeral();
        sign_entry(&mut entry, &signer).unwrap();
        let old_signature = entry.signatures[0].signature.clone();

        rewrite_location(&mut entry, "https://example.com/self");
        assert!(entry.signatures.is_empty());
        assert_eq!(
            entry.storage.location.as_deref(),
            Some("https://example.com/self")
        );

        sign_entry(&mut entry, &signer).unwrap();
        assert_eq!(entry.signatures.len(), 1);
        assert_ne!(entry.signatures[0].signature, old_signature);
    }

    #[test]
    fn test_old_signature_fails_after_rewrite() {
        let mut entry = draft().build();
        let signer = EntrySigner::ephemeral();
        sign_entry(&mut entry, &signer).unwrap();
        let old_signature = entry.signatures[0].clone();

        rewrite_location(&mut entry, "https://example.com/self");
        sign_entry(&mut entry, &signer).unwrap();

        let new_canonical = entry.canonical_unsigned().unwrap();
        assert!(verify_entry_signature(&old_signature, &new_canonical).is_err());
        verify_entry_signature(&entry.signatures[0], &new_canonical).unwrap();
    }
}
