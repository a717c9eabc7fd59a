//! Core types and data structures for Codex provenance entries
//!
//! This crate provides the fundamental data structures used throughout the
//! Codex Forge ecosystem: the entry record itself, the canonical JSON form
//! used for hashing and signing, and the self-describing integrity token
//! that content-addresses an artifact.

pub mod canonical;
pub mod entry;
pub mod error;
pub mod integrity;

pub use canonical::{canonicalize, CanonicalBytes};
pub use entry::{
    Anchor, Encryption, Entry, EntrySignature, Identity, Storage, StorageProtocol, ENTRY_VERSION,
};
pub use error::{Error, Result};
pub use integrity::{HashAlgorithm, IntegrityProof, Sha256Hash};
