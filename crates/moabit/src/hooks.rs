//! Pre-save MIME type correction.
//!
//! The host stores files keyed by MIME type, so a record saved with a type
//! the table cannot map loses its extension on download. This hook runs
//! before the host persists a record: a known extension snaps the record to
//! the table's MIME type, an unknown one gets a synthetic type minted from
//! the detected type plus the extension, remembered in the side file so the
//! next upload of that extension resolves directly.
//!
//! The hook never fails the save. Everything that can go wrong is logged and
//! the record goes through with the best MIME type available.

use crate::core::config::MediaConfig;
use crate::core::mime::{is_image_mime, is_text_mime};
use crate::core::sidecar;
use crate::core::table::MimeTypeTable;
use crate::types::DocumentRecord;
use std::path::Path;
use tracing::{error, info};

/// Extensions that belong to the host's office-document parsers. Their MIME
/// types are sometimes misdetected, but minting a synthetic type would
/// hijack them from the parser that can actually read them.
pub const EXCLUDED_EXTENSIONS: &[&str] = &[
    ".docx", ".doc", ".odt", ".ppt", ".pptx", ".odp", ".xls", ".xlsx", ".ods",
];

/// Correct a record's MIME type from its filename extension.
///
/// Combined-table match wins; otherwise a synthetic `{mime}-{ext}` type is
/// assigned and recorded, unless the detected type is `text/*`/`image/*` or
/// the extension is an excluded office format.
pub fn correct_mime_type(record: &mut DocumentRecord, config: &MediaConfig) {
    let extension = Path::new(&record.original_filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()));

    let Some(extension) = extension else {
        // No extension, nothing to round-trip.
        return;
    };

    let table = MimeTypeTable::load(&config.sidecar_path);

    if let Some(matched) = table.mime_for_extension(&extension) {
        if record.mime_type != matched {
            record.mime_type = matched.to_string();
        }
        return;
    }

    let current = record.mime_type.clone();
    if is_text_mime(&current) || is_image_mime(&current) || EXCLUDED_EXTENSIONS.contains(&extension.as_str()) {
        return;
    }

    let custom = format!("{}-{}", current, &extension[1..]);

    match sidecar::append_entry(&config.sidecar_path, &custom, &extension) {
        Ok(()) => {
            info!(mime_type = %custom, extension = %extension, "recorded generated MIME type");
        }
        Err(err) => {
            error!(
                path = %config.sidecar_path.display(),
                error = %err,
                "failed to record generated MIME type"
            );
        }
    }

    // The record gets the synthetic type even when recording it failed; the
    // side file is a cache, not the source of truth for this save.
    record.mime_type = custom;
}
