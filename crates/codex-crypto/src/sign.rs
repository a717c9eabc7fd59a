//! Detached ES256 signatures over canonical entry bytes

use crate::error::{Error, Result};
use crate::keys::{kid_for_verifying_key, verifying_key_from_kid};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use codex_types::{CanonicalBytes, EntrySignature};
use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;

/// Algorithm name carried in every signature object
pub const ES256_ALG: &str = "ES256";

/// Produces detached signatures for Codex entries
///
/// In ephemeral mode a fresh P-256 key pair is generated for every call and
/// discarded afterwards; the public half survives inside the signature's
/// `kid`. Supplying a durable key makes repeated signatures attributable to
/// the same identity.
pub struct EntrySigner {
    key: Option<SigningKey>,
}

impl EntrySigner {
    /// A signer that generates a fresh ephemeral key pair per signature
    pub fn ephemeral() -> Self {
        EntrySigner { key: None }
    }

    /// A signer backed by a durable key
    pub fn with_key(key: SigningKey) -> Self {
        EntrySigner { key: Some(key) }
    }

    /// Sign a canonical byte string, returning a detached signature object
    ///
    /// Only [`CanonicalBytes`] is accepted: callers cannot hand this
    /// function a non-canonical serialization. The input is never mutated.
    pub fn sign(&self, canonical: &CanonicalBytes) -> Result<EntrySignature> {
        let key = match &self.key {
            Some(key) => key.clone(),
            None => SigningKey::random(&mut OsRng),
        };
        let signature: Signature = key
            .try_sign(canonical.as_bytes())
            .map_err(|e| Error::Signing(e.to_string()))?;
        let kid = kid_for_verifying_key(key.verifying_key())?;
        Ok(EntrySignature {
            alg: ES256_ALG.to_string(),
            kid,
            // raw r||s, 64 bytes, as WebCrypto ES256 produces
            signature: URL_SAFE_NO_PAD.encode(signature.to_bytes()),
        })
    }
}

/// Verify a detached signature against a canonical byte string
///
/// The verification key is recovered from the signature's `kid`.
pub fn verify_entry_signature(sig: &EntrySignature, canonical: &CanonicalBytes) -> Result<()> {
    if sig.alg != ES256_ALG {
        return Err(Error::Verification(format!(
            "unsupported signature algorithm: {}",
            sig.alg
        )));
    }
    let verifying_key: VerifyingKey = verifying_key_from_kid(&sig.kid)?;
    let raw = URL_SAFE_NO_PAD
        .decode(&sig.signature)
        .map_err(|e| Error::Verification(format!("invalid base64url signature: {e}")))?;
    let signature = Signature::from_slice(&raw)
        .map_err(|e| Error::Verification(format!("malformed signature bytes: {e}")))?;
    verifying_key
        .verify(canonical.as_bytes(), &signature)
        .map_err(|e| Error::Verification(e.to_string()))
}
