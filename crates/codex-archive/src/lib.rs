//! Encrypted archive packaging for Codex entries
//!
//! Packs an artifact together with its provenance entry into a single
//! AES-256 encrypted zip. The entry document inside the archive is a
//! redacted copy with the operational fields removed, suitable for
//! sharing; the complete entry travels in the archive comment, which is
//! part of the zip container rather than an encrypted member.
//!
//! Entries are stored uncompressed: the artifact bytes are encrypted
//! anyway, and keeping them stored makes the produced digests independent
//! of compressor behavior.

pub mod error;

pub use error::{PackagingError, Result};

use codex_types::Entry;
use serde_json::Value;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{AesMode, CompressionMethod, ZipWriter};

/// Name of the entry document member inside the archive
pub const ENTRY_FILE_NAME: &str = "codex-entry.json";

/// Produce the redacted sharing copy of an entry
///
/// Removes the advisory storage location and the anchor transaction and
/// URL. The redacted copy deliberately fails schema validation; it exists
/// for disclosure, not verification.
pub fn redacted_value(entry: &Entry) -> Result<Value> {
    let mut value = serde_json::to_value(entry)?;
    if let Some(storage) = value.get_mut("storage").and_then(Value::as_object_mut) {
        storage.remove("location");
    }
    if let Some(anchor) = value.get_mut("anchor").and_then(Value::as_object_mut) {
        anchor.remove("tx");
        anchor.remove("url");
    }
    Ok(value)
}

/// Pack an artifact and its entry into an encrypted zip
///
/// The archive holds two AES-256 encrypted members, the artifact under
/// `artifact_name` and the redacted entry under [`ENTRY_FILE_NAME`], plus
/// the full entry JSON as the (unencrypted) archive comment.
pub fn pack(
    artifact: &[u8],
    artifact_name: &str,
    entry: &Entry,
    password: &str,
) -> Result<Vec<u8>> {
    if artifact_name.is_empty() {
        return Err(PackagingError::EmptyArtifactName);
    }
    if password.is_empty() {
        return Err(PackagingError::EmptyPassword);
    }

    let redacted = serde_json::to_string_pretty(&redacted_value(entry)?)?;
    let full = entry.to_json()?;

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .with_aes_encryption(AesMode::Aes256, password);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.set_comment(full);

    writer.start_file(artifact_name, options)?;
    writer.write_all(artifact)?;

    writer.start_file(ENTRY_FILE_NAME, options)?;
    writer.write_all(redacted.as_bytes())?;

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex_crypto::EntrySigner;
    use codex_entry::{sign_entry, EntryDraft};
    use codex_types::{Anchor, IntegrityProof, Sha256Hash, StorageProtocol};
    use std::io::Read;
    use uuid::Uuid;
    use zip::ZipArchive;

    fn sample_entry() -> Entry {
        let proof = IntegrityProof::from_sha256(&Sha256Hash::from_bytes([7u8; 32]));
        let anchor = Anchor {
            chain: "mock:local".to_string(),
            tx: "tx-bytes".to_string(),
            hash_alg: "sha-256".to_string(),
            url: Some("https://anchors.test/tx-bytes".to_string()),
            timestamp: None,
        };
        let mut entry = EntryDraft::new(Uuid::new_v4(), proof, anchor)
            .identity("Codex Forge", "File-Upload-Hashed", "report.txt")
            .storage(StorageProtocol::Local, Some("report.txt".to_string()))
            .build();
        sign_entry(&mut entry, &EntrySigner::ephemeral()).unwrap();
        entry
    }

    fn read_member(zip_bytes: &[u8], name: &str, password: &str) -> Vec<u8> {
        let mut archive = ZipArchive::new(Cursor::new(zip_bytes.to_vec())).unwrap();
        let mut member = archive.by_name_decrypt(name, password.as_bytes()).unwrap();
        let mut bytes = Vec::new();
        member.read_to_end(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pack_contains_artifact_and_redacted_entry() {
        let entry = sample_entry();
        let zip_bytes = pack(b"report body", "report.txt", &entry, "hunter2").unwrap();

        assert_eq!(
            read_member(&zip_bytes, "report.txt", "hunter2"),
            b"report body"
        );

        let redacted: Value = serde_json::from_slice(&read_member(
            &zip_bytes,
            ENTRY_FILE_NAME,
            "hunter2",
        ))
        .unwrap();
        assert!(redacted["storage"].get("location").is_none());
        assert!(redacted["anchor"].get("tx").is_none());
        assert!(redacted["anchor"].get("url").is_none());
        // Non-operational fields survive redaction.
        assert_eq!(redacted["id"], entry.id.to_string());
        assert_eq!(
            redacted["storage"]["integrity_proof"],
            entry.storage.integrity_proof.to_string()
        );
    }

    #[test]
    fn test_comment_carries_full_entry() {
        let entry = sample_entry();
        let zip_bytes = pack(b"report body", "report.txt", &entry, "hunter2").unwrap();

        let archive = ZipArchive::new(Cursor::new(zip_bytes)).unwrap();
        let parsed = Entry::from_json(std::str::from_utf8(archive.comment()).unwrap()).unwrap();
        assert_eq!(parsed, entry);
        assert_eq!(
            parsed.storage.location.as_deref(),
            Some("report.txt"),
            "comment keeps the fields the member redacts"
        );
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let entry = sample_entry();
        let zip_bytes = pack(b"secret", "secret.bin", &entry, "correct").unwrap();

        let mut archive = ZipArchive::new(Cursor::new(zip_bytes)).unwrap();
        assert!(archive.by_name_decrypt("secret.bin", b"wrong").is_err());
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let entry = sample_entry();
        assert!(matches!(
            pack(b"x", "", &entry, "pw"),
            Err(PackagingError::EmptyArtifactName)
        ));
        assert!(matches!(
            pack(b"x", "x.bin", &entry, ""),
            Err(PackagingError::EmptyPassword)
        ));
    }
}
