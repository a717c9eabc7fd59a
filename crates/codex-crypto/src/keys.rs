//! Key identifiers that embed the verification key
//!
//! A `kid` has the form `jwk:<base64url(canonical JWK)>`. The JWK carries
//! the P-256 public key coordinates, so the verification key travels with
//! the signature and no key registry is needed.

use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use codex_types::canonicalize;
use p256::ecdsa::VerifyingKey;
use p256::EncodedPoint;
use serde_json::json;

const KID_PREFIX: &str = "jwk:";

/// Encode a verifying key as a `jwk:`-prefixed key identifier
///
/// The embedded JWK is canonicalized before encoding so the same key always
/// yields the same kid.
pub fn kid_for_verifying_key(key: &VerifyingKey) -> Result<String> {
    let point = key.to_encoded_point(false);
    let x = point
        .x()
        .ok_or_else(|| Error::Signing("public key missing x coordinate".to_string()))?;
    let y = point
        .y()
        .ok_or_else(|| Error::Signing("public key missing y coordinate".to_string()))?;
    let jwk = json!({
        "kty": "EC",
        "crv": "P-256",
        "x": URL_SAFE_NO_PAD.encode(x),
        "y": URL_SAFE_NO_PAD.encode(y),
    });
    let canonical = canonicalize(&jwk)?;
    Ok(format!("{KID_PREFIX}{}", URL_SAFE_NO_PAD.encode(canonical.as_bytes())))
}

/// Recover the verification key from a `jwk:` key identifier
pub fn verifying_key_from_kid(kid: &str) -> Result<VerifyingKey> {
    let body = kid
        .strip_prefix(KID_PREFIX)
        .ok_or_else(|| Error::InvalidKid(format!("missing {KID_PREFIX} prefix")))?;
    let jwk_bytes = URL_SAFE_NO_PAD
        .decode(body)
        .map_err(|e| Error::InvalidKid(format!("invalid base64url: {e}")))?;
    let jwk: serde_json::Value = serde_json::from_slice(&jwk_bytes)?;

    let kty = jwk.get("kty").and_then(|v| v.as_str());
    let crv = jwk.get("crv").and_then(|v| v.as_str());
    if kty != Some("EC") || crv != Some("P-256") {
        return Err(Error::InvalidKid(format!(
            "expected EC/P-256 key, got {kty:?}/{crv:?}"
        )));
    }

    let x = decode_coordinate(&jwk, "x")?;
    let y = decode_coordinate(&jwk, "y")?;
    let point = EncodedPoint::from_affine_coordinates(
        x.as_slice().into(),
        y.as_slice().into(),
        false,
    );
    VerifyingKey::from_encoded_point(&point)
        .map_err(|e| Error::InvalidKid(format!("invalid public key point: {e}")))
}

fn decode_coordinate(jwk: &serde_json::Value, name: &str) -> Result<[u8; 32]> {
    let value = jwk
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::InvalidKid(format!("missing {name} coordinate")))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|e| Error::InvalidKid(format!("invalid {name} coordinate: {e}")))?;
    bytes
        .try_into()
        .map_err(|_| Error::InvalidKid(format!("{name} coordinate must be 32 bytes")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::ecdsa::SigningKey;
    use rand::rngs::OsRng;

    #[test]
    fn test_kid_round_trip() {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = *signing_key.verifying_key();
        let kid = kid_for_verifying_key(&verifying_key).unwrap();
        assert!(kid.starts_with("jwk:"));
        let recovered = verifying_key_from_kid(&kid).unwrap();
        assert_eq!(recovered, verifying_key);
    }

    #[test]
    fn test_kid_is_deterministic() {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = *signing_key.verifying_key();
        let a = kid_for_verifying_key(&verifying_key).unwrap();
        let b = kid_for_verifying_key(&verifying_key).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_kid_rejects_garbage() {
        assert!(verifying_key_from_kid("not-a-kid").is_err());
        assert!(verifying_key_from_kid("jwk:!!!").is_err());
        let rsa = URL_SAFE_NO_PAD.encode(r#"{"kty":"RSA"}"#);
        assert!(verifying_key_from_kid(&format!("jwk:{rsa}")).is_err());
    }
}
