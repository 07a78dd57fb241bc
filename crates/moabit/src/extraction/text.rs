//! Text excerpt sniffing.
//!
//! Media files occasionally carry indexable text in their head: sidecar
//! subtitle dumps, project files with embedded XML, playlists. The routine
//! here decodes the first few kilobytes leniently and applies a cheap
//! "is this real text" heuristic, so the search index gets something useful
//! without a format-specific parser - and garbage bytes never reach it.

use crate::core::mime::{OCTET_STREAM_MIME_TYPE, is_audio_mime, is_text_mime, is_video_mime};
use once_cell::sync::Lazy;
use regex::Regex;

static NON_WHITELIST: Lazy<Regex> = Lazy::new(|| {
    // A-Za-z0-9, standard punctuation, whitespace. Everything else goes.
    Regex::new(r#"[^A-Za-z0-9!@#$%^&*()_+\-=\[\]{}\\|;:'",<.>/?`~\s]"#)
        .expect("character whitelist pattern is valid and should compile")
});

static WORD_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+\b").expect("word token pattern is valid and should compile"));

/// Returns true for MIME types that never yield indexable text.
pub fn is_skipped_mime(mime_type: &str) -> bool {
    is_audio_mime(mime_type) || is_video_mime(mime_type) || mime_type == OCTET_STREAM_MIME_TYPE
}

/// Decode raw bytes leniently and strip everything outside the whitelist.
///
/// Invalid UTF-8 sequences are dropped rather than rejected, then null bytes
/// and non-whitelisted characters are removed.
pub fn sanitize_excerpt(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let text = text.replace(['\u{0}', '\u{FFFD}'], "");
    NON_WHITELIST.replace_all(&text, "").into_owned()
}

/// Cheap "is this real text" check: at least `min_words` word-like tokens
/// among the printable characters.
pub fn is_meaningful_text(text: &str, min_words: usize) -> bool {
    let printable: String = text.chars().filter(|c| !c.is_control()).collect();
    WORD_TOKEN.find_iter(&printable).count() >= min_words
}

/// Produce the excerpt for a file head, applying the per-MIME rules.
///
/// - audio, video, and generic octet-stream content is always empty;
/// - `text/*` keeps the full sanitized excerpt;
/// - anything else keeps it only when it passes [`is_meaningful_text`].
pub fn sniff_excerpt(raw: &[u8], mime_type: &str, min_words: usize) -> String {
    if is_skipped_mime(mime_type) {
        return String::new();
    }

    let sanitized = sanitize_excerpt(raw);

    if is_text_mime(mime_type) {
        return sanitized;
    }

    if is_meaningful_text(&sanitized, min_words) {
        sanitized
    } else {
        String::new()
    }
}
