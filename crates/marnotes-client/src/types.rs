//! Public types for the marnotes client.

use std::fmt;

use serde::{Deserialize, Serialize};

/// File suffix the server stores documents under.
pub const JSON_SUFFIX: &str = ".json";

/// A document identifier as listed by the server, e.g. `notes.json`.
///
/// The identifier is opaque apart from an optional `.json` suffix. Request
/// paths and selection matching both use the [`stem`](Self::stem), so
/// `notes` and `notes.json` name the same document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identifier exactly as the server listed it.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier with one trailing `.json` removed.
    pub fn stem(&self) -> &str {
        self.0.strip_suffix(JSON_SUFFIX).unwrap_or(&self.0)
    }

    /// Whether both identifiers name the same document.
    pub fn correlates(&self, other: &Self) -> bool {
        self.stem() == other.stem()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Ordered list of documents, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentList {
    /// Document identifiers.
    pub documents: Vec<DocumentId>,
    /// Count reported by the server, or the list length when the server
    /// omitted it. Equals `documents.len()` for a well-behaved server.
    pub count: usize,
}

impl DocumentList {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentId> {
        self.documents.iter()
    }
}

/// Raw JSON content of a single document, stored verbatim.
pub type DocumentContent = serde_json::Value;

/// How a document's content should be displayed.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedContent {
    /// A serialized rich-text editor state (`root.children` present).
    StructuredDocument(serde_json::Value),
    /// Any other JSON, pretty-printed with two-space indentation.
    OpaqueJson(String),
}

impl RenderedContent {
    /// Classify document content.
    ///
    /// Content is structured when it is an object with a `root` object whose
    /// `children` member is an array. Everything else is opaque.
    pub fn classify(content: &DocumentContent) -> Self {
        let structured = content
            .get("root")
            .filter(|root| root.is_object())
            .and_then(|root| root.get("children"))
            .is_some_and(serde_json::Value::is_array);

        if structured {
            Self::StructuredDocument(content.clone())
        } else {
            Self::OpaqueJson(pretty(content))
        }
    }

    /// Whether the content was recognized as a rich-text document.
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::StructuredDocument(_))
    }

    /// Text form, for surfaces that cannot render an editor state.
    pub fn to_text(&self) -> String {
        match self {
            Self::StructuredDocument(v) => pretty(v),
            Self::OpaqueJson(s) => s.clone(),
        }
    }
}

fn pretty(value: &serde_json::Value) -> String {
    // Serializing a `Value` cannot fail: all map keys are strings.
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Result of probing the server for an encryption public key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EncryptionCapability {
    /// The server offers no key, or the probe failed.
    #[default]
    Unsupported,
    /// PEM-encoded public key published by the server.
    PublicKey(String),
}

impl EncryptionCapability {
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::PublicKey(_))
    }
}

/// Whether `content` has the shape of an encrypted envelope,
/// `{"encrypted": "<base64>"}`. Only meaningful once the server has
/// published a key; otherwise such a body is an ordinary document.
pub(crate) fn is_encrypted_envelope(content: &DocumentContent) -> bool {
    content.as_object().is_some_and(|obj| {
        obj.len() == 1 && obj.get("encrypted").is_some_and(serde_json::Value::is_string)
    })
}

/// Health check result.
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the server answered `/health` successfully.
    pub ok: bool,
    /// Reported status string, usually `healthy`.
    pub status: Option<String>,
    /// Documents directory the server is serving from.
    pub docs_dir: Option<String>,
    /// Round-trip latency in milliseconds.
    pub latency_ms: u128,
}

// --- Internal API response types ---

#[derive(Deserialize)]
pub(crate) struct DocumentListResponse {
    #[serde(default)]
    pub documents: Option<Vec<DocumentId>>,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Deserialize)]
pub(crate) struct HealthResponse {
    pub status: Option<String>,
    #[serde(rename = "docsDir")]
    pub docs_dir: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn stem_strips_one_json_suffix() {
        assert_eq!(DocumentId::from("a.json").stem(), "a");
        assert_eq!(DocumentId::from("a").stem(), "a");
        assert_eq!(DocumentId::from("a.json.json").stem(), "a.json");
        assert_eq!(DocumentId::from(".json").stem(), "");
    }

    #[test]
    fn correlation_ignores_suffix() {
        let listed = DocumentId::from("notes.json");
        assert!(listed.correlates(&DocumentId::from("notes")));
        assert!(listed.correlates(&DocumentId::from("notes.json")));
        assert!(!listed.correlates(&DocumentId::from("notes2.json")));
    }

    #[test]
    fn editor_state_is_structured() {
        let doc = json!({
            "root": {
                "type": "root",
                "children": [{ "type": "paragraph", "children": [] }]
            }
        });
        let rendered = RenderedContent::classify(&doc);
        assert_eq!(rendered, RenderedContent::StructuredDocument(doc));
    }

    #[test]
    fn empty_children_still_structured() {
        let doc = json!({ "root": { "children": [] } });
        assert!(RenderedContent::classify(&doc).is_structured());
    }

    #[test]
    fn root_without_children_is_opaque() {
        let doc = json!({ "root": { "type": "root" } });
        assert!(!RenderedContent::classify(&doc).is_structured());
    }

    #[test]
    fn non_array_children_is_opaque() {
        let doc = json!({ "root": { "children": "nope" } });
        assert!(!RenderedContent::classify(&doc).is_structured());
    }

    #[test]
    fn opaque_json_is_pretty_printed() {
        let doc = json!({ "title": "hello", "tags": [1] });
        let RenderedContent::OpaqueJson(text) = RenderedContent::classify(&doc) else {
            panic!("expected opaque json");
        };
        assert_eq!(text, "{\n  \"title\": \"hello\",\n  \"tags\": [\n    1\n  ]\n}");
    }

    #[test]
    fn scalars_are_opaque() {
        assert_eq!(
            RenderedContent::classify(&json!(42)),
            RenderedContent::OpaqueJson("42".to_owned())
        );
        assert_eq!(
            RenderedContent::classify(&json!(null)),
            RenderedContent::OpaqueJson("null".to_owned())
        );
    }

    #[test]
    fn list_response_tolerates_missing_and_null_documents() {
        let missing: DocumentListResponse = serde_json::from_str("{}").unwrap();
        assert!(missing.documents.is_none());

        let null: DocumentListResponse =
            serde_json::from_str(r#"{"documents": null, "count": 0}"#).unwrap();
        assert!(null.documents.is_none());
        assert_eq!(null.count, Some(0));
    }

    #[test]
    fn envelope_shape_is_exactly_one_string_member() {
        assert!(is_encrypted_envelope(&json!({ "encrypted": "b64" })));
        assert!(!is_encrypted_envelope(&json!({ "encrypted": true })));
        assert!(!is_encrypted_envelope(&json!({ "encrypted": "x", "title": "t" })));
        assert!(!is_encrypted_envelope(&json!(["encrypted"])));
    }
}
