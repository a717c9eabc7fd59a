//! Digest and signing primitives for Codex entries
//!
//! This crate computes SHA-256 content digests and produces detached ES256
//! (ECDSA P-256, SHA-256) signatures over canonical entry bytes. When no
//! durable signing key is supplied, an ephemeral key pair is generated per
//! signature and the public key is embedded in the signature's `kid`, so a
//! verifier can recover the verification key without any external lookup.

pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use error::{Error, Result};
pub use hash::sha256;
pub use keys::{kid_for_verifying_key, verifying_key_from_kid};
pub use sign::{verify_entry_signature, EntrySigner, ES256_ALG};
