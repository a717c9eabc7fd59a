//! Blob storage provider interface

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reference to an uploaded object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Provider-assigned object identifier
    pub id: String,
    /// Fetchable reference to the object
    #[serde(rename = "webViewLink", default)]
    pub url: String,
}

/// Metadata returned by an existence check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(default)]
    pub trashed: bool,
}

/// A remote store for artifact and entry bytes
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload bytes under a filename, returning the assigned reference
    async fn upload(
        &self,
        bytes: &[u8],
        filename: &str,
        mime_type: &str,
        token: &str,
    ) -> Result<StoredObject>;

    /// Check that an object exists and is not trashed
    async fn exists(&self, id: &str, token: &str) -> Result<ObjectMetadata>;

    /// Replace the content of an existing object
    async fn update(&self, id: &str, bytes: &[u8], token: &str) -> Result<StoredObject>;
}

/// Classification rule mapping a filename predicate to a MIME type
struct MimeRule {
    matches: fn(&str) -> bool,
    mime: &'static str,
}

fn has_extension(name: &str, ext: &str) -> bool {
    name.to_ascii_lowercase().ends_with(ext)
}

// Ordered strategy table; the catch-all default is always last.
const MIME_RULES: &[MimeRule] = &[
    MimeRule {
        matches: |n| has_extension(n, ".txt"),
        mime: "text/plain",
    },
    MimeRule {
        matches: |n| has_extension(n, ".json"),
        mime: "application/json",
    },
    MimeRule {
        matches: |n| has_extension(n, ".md"),
        mime: "text/markdown",
    },
    MimeRule {
        matches: |_| true,
        mime: "application/octet-stream",
    },
];

/// Pick an upload MIME type from a filename
pub fn mime_for_filename(filename: &str) -> &'static str {
    MIME_RULES
        .iter()
        .find(|rule| (rule.matches)(filename))
        .map(|rule| rule.mime)
        .unwrap_or("application/octet-stream")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_filename() {
        assert_eq!(mime_for_filename("notes.TXT"), "text/plain");
        assert_eq!(mime_for_filename("entry.json"), "application/json");
        assert_eq!(mime_for_filename("README.md"), "text/markdown");
        assert_eq!(mime_for_filename("photo.png"), "application/octet-stream");
        assert_eq!(mime_for_filename("noextension"), "application/octet-stream");
    }

    #[test]
    fn test_stored_object_deserializes_drive_response() {
        let json = r#"{"id": "abc123", "webViewLink": "https://drive.google.com/file/d/abc123"}"#;
        let obj: StoredObject = serde_json::from_str(json).unwrap();
        assert_eq!(obj.id, "abc123");
        assert_eq!(obj.url, "https://drive.google.com/file/d/abc123");
    }
}
