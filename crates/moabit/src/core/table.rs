//! Combined MIME type table.
//!
//! Merges the built-in table with the generated side file. Built-in entries
//! are inserted first and win on key conflict; within the combined table each
//! MIME type maps to exactly one extension. Extension lookups scan in
//! insertion order and the first match wins, so built-in mappings always
//! shadow generated ones.

use crate::core::mime::builtin_mime_types;
use crate::core::sidecar;
use indexmap::IndexMap;
use std::path::Path;
use tracing::{error, warn};

/// Ordered MIME-type-to-extension mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeTypeTable {
    entries: IndexMap<String, String>,
}

impl MimeTypeTable {
    /// The built-in table alone, without side-file entries.
    pub fn builtin() -> Self {
        let entries = builtin_mime_types()
            .iter()
            .map(|(mime_type, ext)| (mime_type.to_string(), ext.to_string()))
            .collect();
        Self { entries }
    }

    /// Load the combined table: built-in entries first, then the side file.
    ///
    /// Side-file problems never fail the load. A missing file logs a warning
    /// (first run looks like this), a read error logs at error level; either
    /// way the built-in table is returned.
    pub fn load(sidecar_path: &Path) -> Self {
        let mut table = Self::builtin();

        if !sidecar_path.exists() {
            warn!(path = %sidecar_path.display(), "generated MIME type file not found");
            return table;
        }

        match sidecar::read_entries(sidecar_path) {
            Ok(entries) => {
                for (mime_type, extension) in entries {
                    // First writer wins among generated entries; built-ins
                    // always win.
                    if !table.entries.contains_key(&mime_type) {
                        table.entries.insert(mime_type, extension);
                    }
                }
            }
            Err(err) => {
                error!(
                    path = %sidecar_path.display(),
                    error = %err,
                    "failed to read generated MIME type file"
                );
            }
        }

        table
    }

    /// Preferred extension (with leading dot) for a MIME type.
    pub fn extension_for(&self, mime_type: &str) -> Option<&str> {
        self.entries.get(mime_type).map(String::as_str)
    }

    /// First MIME type whose extension matches, scanning in table order.
    ///
    /// The extension is expected lowercased and with its leading dot, which
    /// is how the pre-save hook derives it from the filename.
    pub fn mime_for_extension(&self, extension: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, ext)| ext.as_str() == extension)
            .map(|(mime_type, _)| mime_type.as_str())
    }

    pub fn contains_mime(&self, mime_type: &str) -> bool {
        self.entries.contains_key(mime_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(mime_type, extension)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(m, e)| (m.as_str(), e.as_str()))
    }

    /// Consume the table into its ordered entries.
    pub fn into_entries(self) -> IndexMap<String, String> {
        self.entries
    }
}
