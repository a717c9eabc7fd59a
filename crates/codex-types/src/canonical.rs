//! Deterministic JSON canonicalization (RFC 8785 style)
//!
//! The canonical form is the exact byte string that gets hashed and signed.
//! Objects are rewritten with keys sorted by UTF-8 byte order (equivalent to
//! Unicode code point order), arrays keep element order, and the output
//! carries no whitespace. Scalars use serde_json's fixed formatting: itoa
//! for integers, ryu shortest-round-trip for floats. Two structurally equal
//! values canonicalize to byte-identical output regardless of insertion
//! order.

use crate::error::Result;
use serde_json::Value;

/// The canonical serialization of a JSON value
///
/// Only [`canonicalize`] constructs this type. Signers accept
/// `CanonicalBytes` rather than raw byte slices, so signing a
/// non-canonical serialization is a type error rather than a runtime bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalBytes(String);

impl CanonicalBytes {
    /// The canonical bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The canonical form as a UTF-8 string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the underlying byte vector
    pub fn into_vec(self) -> Vec<u8> {
        self.0.into_bytes()
    }
}

/// Produce the canonical byte serialization of a JSON value
pub fn canonicalize(value: &Value) -> Result<CanonicalBytes> {
    let mut out = String::new();
    write_canonical(value, &mut out)?;
    Ok(CanonicalBytes(out))
}

fn write_canonical(value: &Value, out: &mut String) -> Result<()> {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key)?);
                out.push(':');
                write_canonical(&map[key.as_str()], out)?;
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        scalar => out.push_str(&serde_json::to_string(scalar)?),
    }
    Ok(())
}
