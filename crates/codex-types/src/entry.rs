//! The Codex entry record
//!
//! An entry is a tamper-evident, self-describing provenance record binding
//! an artifact's cryptographic digest, its descriptive identity, an external
//! anchoring proof, and one or more detached signatures. The JSON form of
//! this struct is the persisted wire format; field names are a bit-exact
//! contract consumed by any verifier.

use crate::canonical::{canonicalize, CanonicalBytes};
use crate::error::{Error, Result};
use crate::integrity::IntegrityProof;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The fixed protocol version; entries of different versions are not
/// interchangeable.
pub const ENTRY_VERSION: &str = "0.0.2";

/// Storage protocols an entry may declare (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProtocol {
    Ipfs,
    S3,
    AzureBlob,
    Gcs,
    Ftp,
    Local,
    Gdrive,
}

impl StorageProtocol {
    /// The wire token for this protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageProtocol::Ipfs => "ipfs",
            StorageProtocol::S3 => "s3",
            StorageProtocol::AzureBlob => "azureblob",
            StorageProtocol::Gcs => "gcs",
            StorageProtocol::Ftp => "ftp",
            StorageProtocol::Local => "local",
            StorageProtocol::Gdrive => "gdrive",
        }
    }

    /// All wire tokens in the closed set
    pub fn all() -> &'static [&'static str] {
        &["ipfs", "s3", "azureblob", "gcs", "ftp", "local", "gdrive"]
    }
}

impl FromStr for StorageProtocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ipfs" => Ok(StorageProtocol::Ipfs),
            "s3" => Ok(StorageProtocol::S3),
            "azureblob" => Ok(StorageProtocol::AzureBlob),
            "gcs" => Ok(StorageProtocol::Gcs),
            "ftp" => Ok(StorageProtocol::Ftp),
            "local" => Ok(StorageProtocol::Local),
            "gdrive" => Ok(StorageProtocol::Gdrive),
            other => Err(Error::UnknownProtocol(other.to_string())),
        }
    }
}

impl fmt::Display for StorageProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encryption metadata for a stored artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Encryption {
    /// Cipher name, e.g. "AES-256"
    pub alg: String,
}

/// Where and how the artifact is stored
///
/// `integrity_proof` is the sole source of truth for artifact identity and
/// is never recomputed after creation. `location` is advisory and mutable;
/// rewriting it invalidates all prior signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Storage {
    pub protocol: StorageProtocol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub integrity_proof: IntegrityProof,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption: Option<Encryption>,
}

/// Descriptive metadata about the artifact; not integrity-bearing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Identity {
    pub org: String,
    pub process: String,
    pub artifact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// An external, independently verifiable proof reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Anchor {
    /// Chain identifier in `<namespace>:<identifier>` form
    pub chain: String,
    /// Transaction or object identifier on the anchoring surface
    pub tx: String,
    /// Digest algorithm the anchor binds
    pub hash_alg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A detached signature over the canonical form of the entry
///
/// Each signature covers the canonical serialization of the entry with the
/// `signatures` field entirely excluded. Multiple signatures are therefore
/// independent co-signatures over the same unsigned skeleton, not a hash
/// chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntrySignature {
    /// Algorithm name, e.g. "ES256"
    pub alg: String,
    /// Key identifier; embeds the verification key material
    pub kid: String,
    /// Base64url-encoded detached signature
    pub signature: String,
}

/// The central artifact-provenance record
///
/// The top-level schema is closed: parsing rejects unknown properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    /// Opaque unique identifier for this entry (UUID v4), immutable once
    /// assigned. Identifies the entry, not the artifact.
    pub id: Uuid,
    pub version: String,
    pub storage: Storage,
    pub identity: Identity,
    pub anchor: Anchor,
    /// Append-only signature sequence
    pub signatures: Vec<EntrySignature>,
    /// Link to a prior entry; entries may form a chain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_id: Option<Uuid>,
}

impl Entry {
    /// Parse an entry from JSON
    pub fn from_json(json: &str) -> Result<Entry> {
        serde_json::from_str(json).map_err(Error::Json)
    }

    /// Serialize the entry to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::Json)
    }

    /// Serialize the entry to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::Json)
    }

    /// The entry as a JSON value with `signatures` removed
    ///
    /// This is the view every signature covers.
    pub fn unsigned_value(&self) -> Result<Value> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("signatures");
        }
        Ok(value)
    }

    /// Canonical serialization of the unsigned view
    pub fn canonical_unsigned(&self) -> Result<CanonicalBytes> {
        canonicalize(&self.unsigned_value()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrity::Sha256Hash;

    fn sample_entry() -> Entry {
        Entry {
            id: Uuid::new_v4(),
            version: ENTRY_VERSION.to_string(),
            storage: Storage {
                protocol: StorageProtocol::Local,
                location: Some("report.txt".to_string()),
                integrity_proof: IntegrityProof::from_sha256(&Sha256Hash::from_bytes([3u8; 32])),
                encryption: None,
            },
            identity: Identity {
                org: "Codex Forge".to_string(),
                process: "File-Upload-Hashed".to_string(),
                artifact: "report.txt".to_string(),
                subject: None,
            },
            anchor: Anchor {
                chain: "mock:local".to_string(),
                tx: "abc".to_string(),
                hash_alg: "sha-256".to_string(),
                url: None,
                timestamp: None,
            },
            signatures: vec![],
            previous_id: None,
        }
    }

    #[test]
    fn test_entry_json_round_trip() {
        let entry = sample_entry();
        let json = entry.to_json().unwrap();
        let parsed = Entry::from_json(&json).unwrap();
        assert_eq!(entry, parsed);
    }

    #[test]
    fn test_entry_rejects_unknown_top_level_fields() {
        let mut value = serde_json::to_value(sample_entry()).unwrap();
        value
            .as_object_mut()
            .unwrap()
            .insert("extra".to_string(), serde_json::json!(1));
        let result: std::result::Result<Entry, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_unsigned_value_excludes_signatures() {
        let mut entry = sample_entry();
        entry.signatures.push(EntrySignature {
            alg: "ES256".to_string(),
            kid: "jwk:abc".to_string(),
            signature: "sig".to_string(),
        });
        let unsigned = entry.unsigned_value().unwrap();
        assert!(unsigned.get("signatures").is_none());
        assert!(unsigned.get("id").is_some());
    }

    #[test]
    fn test_canonical_unsigned_independent_of_signatures() {
        let mut entry = sample_entry();
        let before = entry.canonical_unsigned().unwrap();
        entry.signatures.push(EntrySignature {
            alg: "ES256".to_string(),
            kid: "jwk:abc".to_string(),
            signature: "sig".to_string(),
        });
        let after = entry.canonical_unsigned().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_storage_protocol_wire_tokens() {
        assert_eq!(
            serde_json::to_string(&StorageProtocol::AzureBlob).unwrap(),
            "\"azureblob\""
        );
        assert_eq!("gdrive".parse::<StorageProtocol>().unwrap(), StorageProtocol::Gdrive);
        assert!("dropbox".parse::<StorageProtocol>().is_err());
    }
}
