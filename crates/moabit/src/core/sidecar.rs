//! The generated MIME type side file.
//!
//! Plain text, one `mime-type: extension` pair per line. Lines starting with
//! `#`, blank lines, and lines without a colon are ignored. The file is the
//! plugin's memory of MIME types it has synthesized for unknown extensions,
//! so those extensions resolve on the next upload instead of being invented
//! again.
//!
//! Appends are not locked. Two concurrent saves of the same novel extension
//! can both append; the reader tolerates the duplicate by keeping the first
//! entry per MIME type.

use crate::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Parse the side file into `(mime_type, extension)` pairs, in file order.
///
/// Extensions are normalized to carry a leading dot. Entries with an empty
/// MIME type or extension are dropped.
///
/// # Errors
///
/// Returns `MoabitError::Io` if the file cannot be read. A missing file is
/// an error too - callers decide whether that is worth a warning.
pub fn read_entries(path: &Path) -> Result<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path)?;

    let mut entries = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((mime_type, extension)) = line.split_once(':') else {
            continue;
        };

        let mime_type = mime_type.trim();
        let extension = extension.trim();
        if mime_type.is_empty() || extension.is_empty() {
            continue;
        }

        let extension = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{}", extension)
        };

        entries.push((mime_type.to_string(), extension));
    }

    Ok(entries)
}

/// Append one `mime-type: extension` line, creating the file if needed.
pub fn append_entry(path: &Path, mime_type: &str, extension: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}: {}", mime_type, extension)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_entries_skips_noise() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("generated.mime-types");
        std::fs::write(
            &path,
            "# synthesized types\n\
             application/octet-stream-afphoto: .afphoto\n\
             \n\
             not a mapping line\n\
             application/pgp-signature-sig: sig\n\
             : .orphan\n\
             application/x-empty:\n",
        )
        .unwrap();

        let entries = read_entries(&path).unwrap();
        assert_eq!(
            entries,
            vec![
                (
                    "application/octet-stream-afphoto".to_string(),
                    ".afphoto".to_string()
                ),
                ("application/pgp-signature-sig".to_string(), ".sig".to_string()),
            ]
        );
    }

    #[test]
    fn test_read_entries_missing_file() {
        let dir = tempdir().unwrap();
        assert!(read_entries(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn test_append_creates_and_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("generated.mime-types");

        append_entry(&path, "application/octet-stream-xyz", ".xyz").unwrap();
        append_entry(&path, "application/zip-jar", ".jar").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "application/octet-stream-xyz: .xyz\napplication/zip-jar: .jar\n"
        );
    }
}
