//! Schema validation for finished entries
//!
//! Pure structural checks with no I/O. Every violation is collected and
//! reported; validation never stops at the first failure, so a caller can
//! display all problems at once.

use codex_types::{Entry, IntegrityProof, StorageProtocol, ENTRY_VERSION};
use serde_json::Value;
use uuid::{Uuid, Version};

/// Top-level fields an entry may carry (closed world)
const TOP_LEVEL_FIELDS: &[&str] = &[
    "id",
    "version",
    "storage",
    "identity",
    "anchor",
    "signatures",
    "previous_id",
];

/// Required top-level fields
const REQUIRED_TOP_LEVEL: &[&str] = &["id", "version", "storage", "identity", "anchor", "signatures"];

/// Hash algorithms an anchor may declare (closed set)
const ANCHOR_HASH_ALGS: &[&str] = &["sha-256", "sha-384", "sha-512"];

/// A single schema violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// JSON-pointer-ish path to the offending field
    pub path: String,
    /// Human-readable description of the violation
    pub message: String,
}

impl ValidationIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// The outcome of validating an entry
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// All violations found; empty means the entry is valid
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Whether the entry passed every check
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validate a typed entry
pub fn validate_entry(entry: &Entry) -> ValidationReport {
    match serde_json::to_value(entry) {
        Ok(value) => validate_value(&value),
        Err(e) => ValidationReport {
            issues: vec![ValidationIssue::new("", format!("unserializable entry: {e}"))],
        },
    }
}

/// Validate an entry given as a raw JSON value
///
/// This is the wire-level gate: it accepts arbitrary JSON and checks every
/// structural and semantic invariant of the entry schema.
pub fn validate_value(value: &Value) -> ValidationReport {
    let mut issues = Vec::new();

    let Some(obj) = value.as_object() else {
        issues.push(ValidationIssue::new("", "entry must be a JSON object"));
        return ValidationReport { issues };
    };

    for field in REQUIRED_TOP_LEVEL {
        if !obj.contains_key(*field) {
            issues.push(ValidationIssue::new(*field, "required field is missing"));
        }
    }
    for key in obj.keys() {
        if !TOP_LEVEL_FIELDS.contains(&key.as_str()) {
            issues.push(ValidationIssue::new(
                key.clone(),
                "unexpected property at top level",
            ));
        }
    }

    if let Some(id) = obj.get("id") {
        check_uuid_v4(id, "id", &mut issues);
    }

    if let Some(version) = obj.get("version") {
        match version.as_str() {
            Some(ENTRY_VERSION) => {}
            Some(other) => issues.push(ValidationIssue::new(
                "version",
                format!("expected \"{ENTRY_VERSION}\", got \"{other}\""),
            )),
            None => issues.push(ValidationIssue::new("version", "must be a string")),
        }
    }

    if let Some(storage) = obj.get("storage") {
        check_storage(storage, &mut issues);
    }
    if let Some(identity) = obj.get("identity") {
        check_identity(identity, &mut issues);
    }
    if let Some(anchor) = obj.get("anchor") {
        check_anchor(anchor, &mut issues);
    }
    if let Some(signatures) = obj.get("signatures") {
        check_signatures(signatures, &mut issues);
    }
    if let Some(previous_id) = obj.get("previous_id") {
        check_uuid_v4(previous_id, "previous_id", &mut issues);
    }

    ValidationReport { issues }
}

fn check_uuid_v4(value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    let Some(s) = value.as_str() else {
        issues.push(ValidationIssue::new(path, "must be a string"));
        return;
    };
    match Uuid::parse_str(s) {
        Ok(uuid) if uuid.get_version() == Some(Version::Random) => {}
        Ok(_) => issues.push(ValidationIssue::new(path, "must be a version-4 UUID")),
        Err(_) => issues.push(ValidationIssue::new(path, "is not a valid UUID")),
    }
}

fn check_required_string(
    obj: &serde_json::Map<String, Value>,
    parent: &str,
    field: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    let path = format!("{parent}.{field}");
    match obj.get(field) {
        Some(v) if v.as_str().map(|s| !s.is_empty()).unwrap_or(false) => {}
        Some(_) => issues.push(ValidationIssue::new(path, "must be a non-empty string")),
        None => issues.push(ValidationIssue::new(path, "required field is missing")),
    }
}

fn check_storage(value: &Value, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = value.as_object() else {
        issues.push(ValidationIssue::new("storage", "must be an object"));
        return;
    };

    match obj.get("protocol").and_then(|v| v.as_str()) {
        Some(token) if token.parse::<StorageProtocol>().is_ok() => {}
        Some(token) => issues.push(ValidationIssue::new(
            "storage.protocol",
            format!(
                "\"{token}\" is not one of {}",
                StorageProtocol::all().join(", ")
            ),
        )),
        None => issues.push(ValidationIssue::new(
            "storage.protocol",
            "required field is missing or not a string",
        )),
    }

    match obj.get("integrity_proof").and_then(|v| v.as_str()) {
        Some(token) => {
            if let Err(e) = IntegrityProof::parse(token) {
                issues.push(ValidationIssue::new("storage.integrity_proof", e.to_string()));
            }
        }
        None => issues.push(ValidationIssue::new(
            "storage.integrity_proof",
            "required field is missing or not a string",
        )),
    }

    if let Some(encryption) = obj.get("encryption") {
        match encryption.as_object() {
            Some(enc) if enc.get("alg").and_then(|v| v.as_str()).is_some() => {}
            _ => issues.push(ValidationIssue::new(
                "storage.encryption",
                "must be an object with a string \"alg\"",
            )),
        }
    }
}

fn check_identity(value: &Value, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = value.as_object() else {
        issues.push(ValidationIssue::new("identity", "must be an object"));
        return;
    };
    check_required_string(obj, "identity", "org", issues);
    check_required_string(obj, "identity", "process", issues);
    check_required_string(obj, "identity", "artifact", issues);
}

fn check_anchor(value: &Value, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = value.as_object() else {
        issues.push(ValidationIssue::new("anchor", "must be an object"));
        return;
    };

    match obj.get("chain").and_then(|v| v.as_str()) {
        Some(chain) if is_chain_id(chain) => {}
        Some(chain) => issues.push(ValidationIssue::new(
            "anchor.chain",
            format!("\"{chain}\" does not match <namespace>:<identifier>"),
        )),
        None => issues.push(ValidationIssue::new(
            "anchor.chain",
            "required field is missing or not a string",
        )),
    }

    check_required_string(obj, "anchor", "tx", issues);

    match obj.get("hash_alg").and_then(|v| v.as_str()) {
        Some(alg) if ANCHOR_HASH_ALGS.contains(&alg) => {}
        Some(alg) => issues.push(ValidationIssue::new(
            "anchor.hash_alg",
            format!("\"{alg}\" is not one of {}", ANCHOR_HASH_ALGS.join(", ")),
        )),
        None => issues.push(ValidationIssue::new(
            "anchor.hash_alg",
            "required field is missing or not a string",
        )),
    }
}

/// `<namespace>:<identifier>` with a lowercase alphanumeric namespace
fn is_chain_id(chain: &str) -> bool {
    match chain.split_once(':') {
        Some((namespace, identifier)) => {
            !namespace.is_empty()
                && !identifier.is_empty()
                && namespace
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        }
        None => false,
    }
}

fn check_signatures(value: &Value, issues: &mut Vec<ValidationIssue>) {
    let Some(items) = value.as_array() else {
        issues.push(ValidationIssue::new("signatures", "must be an array"));
        return;
    };
    for (i, item) in items.iter().enumerate() {
        let parent = format!("signatures[{i}]");
        let Some(obj) = item.as_object() else {
            issues.push(ValidationIssue::new(parent, "must be an object"));
            continue;
        };
        for field in ["alg", "kid", "signature"] {
            check_required_string(obj, &parent, field, issues);
        }
    }
}
