//! Content classification for the identity fields
//!
//! Recognized text-like content gets a human-readable subject and process
//! tag from an external text classifier. The classifier is strictly
//! best-effort: any failure degrades to the deterministic fallbacks below,
//! and classification can never abort an entry-creation run.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

/// What kind of content an artifact holds, as far as classification cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Decodable text; eligible for summarization
    Text,
    /// Everything else
    Binary,
}

/// Classification rule mapping a filename predicate to a content kind
struct KindRule {
    matches: fn(&str) -> bool,
    kind: ContentKind,
}

fn is_text_extension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    [".txt", ".md", ".json"]
        .iter()
        .any(|ext| lower.ends_with(ext))
}

// Ordered strategy table; the catch-all default entry is always present.
const KIND_RULES: &[KindRule] = &[
    KindRule {
        matches: is_text_extension,
        kind: ContentKind::Text,
    },
    KindRule {
        matches: |_| true,
        kind: ContentKind::Binary,
    },
];

/// Classify an artifact by filename
pub fn content_kind(filename: &str) -> ContentKind {
    KIND_RULES
        .iter()
        .find(|rule| (rule.matches)(filename))
        .map(|rule| rule.kind)
        .unwrap_or(ContentKind::Binary)
}

/// Process tag applied to unrecognized binary content
pub const BINARY_PROCESS_TAG: &str = "binary-upload";

/// Error from an external text classifier
#[derive(Debug, Error)]
#[error("classifier error: {0}")]
pub struct ClassifyError(pub String);

/// Best-effort external text classifier
///
/// Implementations may call out to anything; the pipeline treats every
/// failure as a cue to fall back, never as a reason to abort.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Produce a human-readable subject line for the text
    async fn summarize(&self, text: &str) -> std::result::Result<String, ClassifyError>;

    /// Produce a concise process tag for the text
    async fn tag(&self, text: &str) -> std::result::Result<String, ClassifyError>;
}

/// Deterministic fallback subject: the first 100 characters
pub fn fallback_summary(text: &str) -> String {
    let head: String = text.chars().take(100).collect();
    format!("AI Summary: {head}...")
}

/// Deterministic fallback process tag, keyed on text length
pub fn fallback_tag(text: &str) -> String {
    if text.len() > 1000 {
        "AI-Summarized-Web-Page".to_string()
    } else {
        "File-Upload-Hashed".to_string()
    }
}

/// Classifier that just applies the deterministic fallbacks
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

#[async_trait]
impl TextClassifier for HeuristicClassifier {
    async fn summarize(&self, text: &str) -> std::result::Result<String, ClassifyError> {
        Ok(fallback_summary(text))
    }

    async fn tag(&self, text: &str) -> std::result::Result<String, ClassifyError> {
        Ok(fallback_tag(text))
    }
}

/// Run the classifier over decoded text, falling back on any failure
pub(crate) async fn classify_text(
    classifier: &dyn TextClassifier,
    text: &str,
) -> (String, String) {
    let subject = match classifier.summarize(text).await {
        Ok(subject) => subject,
        Err(e) => {
            warn!(error = %e, "summarizer failed, using fallback subject");
            fallback_summary(text)
        }
    };
    let tag = match classifier.tag(text).await {
        Ok(tag) => tag,
        Err(e) => {
            warn!(error = %e, "tagger failed, using fallback tag");
            fallback_tag(text)
        }
    };
    (subject, tag)
}
