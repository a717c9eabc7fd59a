//! Content digests and the self-describing integrity token
//!
//! An artifact is content-addressed by a named-information URI of the form
//! `ni:///sha-256;<base64url-no-padding>`. The token always declares its
//! algorithm, so a verifier needs nothing beyond the token itself to know
//! how the digest was computed.

use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix shared by all integrity tokens
pub const NI_PREFIX: &str = "ni:///";

/// A SHA-256 digest (32 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash([u8; 32]);

impl Sha256Hash {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Sha256Hash(bytes)
    }

    /// Parse from a hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| Error::InvalidHex(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::InvalidHex("expected 32 bytes".to_string()))?;
        Ok(Sha256Hash(arr))
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex encoding
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Base64url (no padding) encoding, as used inside integrity tokens
    pub fn to_base64url(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }
}

/// Hash algorithms an integrity token may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
}

impl HashAlgorithm {
    /// The algorithm token as it appears in an integrity URI
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha-256",
        }
    }

    /// Expected base64url body length for a digest of this algorithm
    pub fn encoded_len(&self) -> usize {
        match self {
            // 32 bytes -> ceil(32 * 4 / 3) unpadded
            HashAlgorithm::Sha256 => 43,
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sha-256" => Ok(HashAlgorithm::Sha256),
            other => Err(Error::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A self-describing digest URI: `ni:///<alg>;<base64url-no-padding>`
///
/// This is the sole source of truth for artifact identity in an entry.
/// Encoding is injective: two distinct digests never produce the same token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntegrityProof(String);

impl IntegrityProof {
    /// Encode a SHA-256 digest as an integrity token
    pub fn from_sha256(hash: &Sha256Hash) -> Self {
        IntegrityProof(format!(
            "{}{};{}",
            NI_PREFIX,
            HashAlgorithm::Sha256.as_str(),
            hash.to_base64url()
        ))
    }

    /// Parse and validate a token, returning its declared algorithm
    pub fn parse(s: &str) -> Result<(HashAlgorithm, Vec<u8>)> {
        let rest = s
            .strip_prefix(NI_PREFIX)
            .ok_or_else(|| Error::InvalidIntegrityProof(format!("missing {NI_PREFIX} prefix")))?;
        let (alg_token, body) = rest
            .split_once(';')
            .ok_or_else(|| Error::InvalidIntegrityProof("missing ';' separator".to_string()))?;
        let alg: HashAlgorithm = alg_token.parse()?;
        if body.len() != alg.encoded_len() {
            return Err(Error::InvalidIntegrityProof(format!(
                "expected {} base64url characters for {}, got {}",
                alg.encoded_len(),
                alg,
                body.len()
            )));
        }
        let digest = URL_SAFE_NO_PAD
            .decode(body)
            .map_err(|e| Error::InvalidIntegrityProof(format!("invalid base64url body: {e}")))?;
        Ok((alg, digest))
    }

    /// The declared hash algorithm
    pub fn algorithm(&self) -> Result<HashAlgorithm> {
        Self::parse(&self.0).map(|(alg, _)| alg)
    }

    /// The token string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this token matches the given digest
    pub fn matches(&self, hash: &Sha256Hash) -> bool {
        *self == IntegrityProof::from_sha256(hash)
    }
}

impl FromStr for IntegrityProof {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)?;
        Ok(IntegrityProof(s.to_string()))
    }
}

impl fmt::Display for IntegrityProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
