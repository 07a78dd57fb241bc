//! Core data types shared across the crate.

use serde::{Deserialize, Serialize};

/// The slice of a host document record this plugin is allowed to touch.
///
/// The host owns the full record; the plugin reads `original_filename` and
/// may overwrite `mime_type` before the record is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Filename the document was uploaded with.
    pub original_filename: String,
    /// MIME type the host's detection assigned to the upload.
    pub mime_type: String,
}

impl DocumentRecord {
    pub fn new(original_filename: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            original_filename: original_filename.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Result of parsing a media document for indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMedia {
    /// Sanitized text excerpt for the host's search index. Empty when the
    /// file has no usable text (audio, video, generic binary).
    pub text: String,
    /// MIME type the content was parsed as.
    pub mime_type: String,
}

impl ParsedMedia {
    /// An empty parse result for formats that carry no indexable text.
    pub fn empty(mime_type: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            mime_type: mime_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_parse_result() {
        let parsed = ParsedMedia::empty("audio/mpeg");
        assert!(parsed.text.is_empty());
        assert_eq!(parsed.mime_type, "audio/mpeg");
    }
}
