//! SHA-256 digest computation

use codex_types::Sha256Hash;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of a byte slice
///
/// Any input size is valid, including zero-length; the digest is never
/// truncated or padded.
pub fn sha256(bytes: &[u8]) -> Sha256Hash {
    let digest = Sha256::digest(bytes);
    Sha256Hash::from_bytes(digest.into())
}
