//! Built-in MIME type table and MIME detection helpers.
//!
//! The table maps MIME types to the file extension a stored document should
//! round-trip with. Direction matters: the host stores files by MIME type,
//! so serving a file back with the right extension requires exactly one
//! extension per MIME type. The reverse is intentionally not unique - two
//! MIME types may map to sibling extensions (`.yaml` vs `.yml`) so that both
//! spellings survive a store/download cycle.

use crate::{MoabitError, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::path::Path;

pub const OCTET_STREAM_MIME_TYPE: &str = "application/octet-stream";

pub const MP4_MIME_TYPE: &str = "video/mp4";
pub const MATROSKA_MIME_TYPE: &str = "video/x-matroska";
pub const QUICKTIME_MIME_TYPE: &str = "video/quicktime";
pub const WEBM_MIME_TYPE: &str = "video/webm";

pub const MP3_MIME_TYPE: &str = "audio/mpeg";
pub const FLAC_MIME_TYPE: &str = "audio/flac";
pub const WAV_MIME_TYPE: &str = "audio/x-wav";
pub const OGG_MIME_TYPE: &str = "audio/ogg";

/// Built-in MIME-type-to-extension table.
///
/// Insertion order is load-bearing: lookups by extension scan the table
/// top-to-bottom and the first match wins, and side-file entries are only
/// ever appended after these.
pub(crate) static BUILTIN_MIME_TYPES: Lazy<IndexMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = IndexMap::new();

    m.insert(MP4_MIME_TYPE, ".mp4");
    m.insert(QUICKTIME_MIME_TYPE, ".mov");
    m.insert(MATROSKA_MIME_TYPE, ".mkv");
    m.insert(WEBM_MIME_TYPE, ".webm");
    m.insert("video/x-msvideo", ".avi");
    m.insert("video/mpeg", ".mpg");
    m.insert("video/x-m4v", ".m4v");
    m.insert("video/3gpp", ".3gp");
    m.insert("video/x-ms-wmv", ".wmv");
    m.insert("video/x-flv", ".flv");

    m.insert(MP3_MIME_TYPE, ".mp3");
    m.insert("audio/mp4", ".m4a");
    m.insert(WAV_MIME_TYPE, ".wav");
    m.insert(FLAC_MIME_TYPE, ".flac");
    m.insert(OGG_MIME_TYPE, ".ogg");
    m.insert("audio/opus", ".opus");
    m.insert("audio/aac", ".aac");
    m.insert("audio/x-ms-wma", ".wma");
    m.insert("audio/x-aiff", ".aiff");
    m.insert("audio/midi", ".mid");

    m.insert("application/zip", ".zip");
    m.insert("application/gzip", ".gz");
    m.insert("application/x-tar", ".tar");
    m.insert("application/x-7z-compressed", ".7z");
    m.insert("application/vnd.rar", ".rar");

    // Formats browsers report as application/octet-stream. Registering a
    // dedicated type keeps the extension attached through storage.
    m.insert("application/x-affinity-designer", ".afdesign");
    m.insert("application/x-affinity-photo", ".afphoto");
    m.insert("application/x-blender", ".blend");
    m.insert("application/x-sqlite3", ".sqlite");
    m.insert("application/x-iso9660-image", ".iso");

    // yaml/yml alias pair: real type for one spelling, synthetic for the
    // other, so both extensions round-trip.
    m.insert("application/yaml", ".yaml");
    m.insert("application/yaml-yml", ".yml");

    m
});

/// Access the built-in table.
pub fn builtin_mime_types() -> &'static IndexMap<&'static str, &'static str> {
    &BUILTIN_MIME_TYPES
}

/// Returns true for `video/*` MIME types.
pub fn is_video_mime(mime_type: &str) -> bool {
    mime_type.starts_with("video/")
}

/// Returns true for `audio/*` MIME types.
pub fn is_audio_mime(mime_type: &str) -> bool {
    mime_type.starts_with("audio/")
}

/// Returns true for `text/*` MIME types.
pub fn is_text_mime(mime_type: &str) -> bool {
    mime_type.starts_with("text/")
}

/// Returns true for `image/*` MIME types.
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// Detect a MIME type from a file path.
///
/// Scans the built-in table first (matching the lookup the pre-save hook
/// performs), falls back to `mime_guess`, and finally to
/// `application/octet-stream` - an upload with an unknown extension is
/// exactly the case this plugin exists for.
///
/// # Errors
///
/// Returns `MoabitError::Validation` if the file doesn't exist (when
/// `check_exists` is true).
pub fn detect_mime_type(path: impl AsRef<Path>, check_exists: bool) -> Result<String> {
    let path = path.as_ref();

    if check_exists && !path.exists() {
        return Err(MoabitError::validation(format!(
            "File does not exist: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| format!(".{}", s.to_lowercase()));

    if let Some(ext) = &extension {
        for (mime_type, table_ext) in BUILTIN_MIME_TYPES.iter() {
            if ext == table_ext {
                return Ok(mime_type.to_string());
            }
        }
    }

    if let Some(guess) = mime_guess::from_path(path).first() {
        return Ok(guess.to_string());
    }

    Ok(OCTET_STREAM_MIME_TYPE.to_string())
}
