//! Document parser plugin trait.
//!
//! This is the contract the host's consumption pipeline drives: given a file
//! and its detected MIME type, produce a thumbnail and an indexable text
//! excerpt.

use crate::plugins::Plugin;
use crate::types::ParsedMedia;
use crate::{MoabitError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Trait for document parser plugins.
///
/// # Weight System
///
/// When multiple parsers claim the same MIME type, the registry selects the
/// parser with the highest weight. Negative weights mark fallback parsers
/// that defer to any native handler the host ships.
///
/// # Thread Safety
///
/// Parsers must be `Send + Sync`; they are stored in `Arc<dyn DocumentParser>`
/// and may serve concurrent consumption workers.
///
/// # Example
///
/// ```rust,no_run
/// use moabit::plugins::{DocumentParser, Plugin};
/// use moabit::{ParsedMedia, Result};
/// use async_trait::async_trait;
/// use std::path::{Path, PathBuf};
///
/// struct SubtitleParser;
///
/// impl Plugin for SubtitleParser {
///     fn name(&self) -> &str { "subtitle-parser" }
///     fn version(&self) -> String { "1.0.0".to_string() }
///     fn initialize(&self) -> Result<()> { Ok(()) }
///     fn shutdown(&self) -> Result<()> { Ok(()) }
/// }
///
/// #[async_trait]
/// impl DocumentParser for SubtitleParser {
///     async fn get_thumbnail(&self, path: &Path, mime_type: &str, file_name: Option<&str>)
///         -> Result<PathBuf> {
///         # let _ = (path, mime_type, file_name);
///         todo!()
///     }
///
///     async fn parse(&self, path: &Path, mime_type: &str, file_name: Option<&str>)
///         -> Result<ParsedMedia> {
///         # let _ = (mime_type, file_name);
///         let raw = std::fs::read_to_string(path)?;
///         Ok(ParsedMedia { text: raw, mime_type: "application/x-subrip".to_string() })
///     }
///
///     fn supported_mime_types(&self) -> Vec<String> {
///         vec!["application/x-subrip".to_string()]
///     }
///
///     fn weight(&self) -> i32 {
///         10
///     }
/// }
/// ```
#[async_trait]
pub trait DocumentParser: Plugin {
    /// Produce a thumbnail for the document and return its path inside the
    /// parser's scratch directory. The file is ephemeral; the host moves or
    /// discards it.
    async fn get_thumbnail(&self, document_path: &Path, mime_type: &str, file_name: Option<&str>)
    -> Result<PathBuf>;

    /// Extract the indexable text for the document.
    async fn parse(&self, document_path: &Path, mime_type: &str, file_name: Option<&str>) -> Result<ParsedMedia>;

    /// MIME types this parser claims. Owned strings because claims can come
    /// from the runtime-extended MIME table, not just static tables.
    fn supported_mime_types(&self) -> Vec<String>;

    /// Arbitration weight; highest wins. Defaults to 0.
    fn weight(&self) -> i32 {
        0
    }
}

/// Register a document parser in the global registry.
pub fn register_parser(parser: Arc<dyn DocumentParser>) -> Result<()> {
    use crate::plugins::registry::get_parser_registry;

    let registry = get_parser_registry();
    let mut registry = registry
        .write()
        .map_err(|e| MoabitError::LockPoisoned(e.to_string()))?;

    registry.register(parser)
}

/// Unregister a document parser by name, calling its `shutdown()`.
pub fn unregister_parser(name: &str) -> Result<()> {
    use crate::plugins::registry::get_parser_registry;

    let registry = get_parser_registry();
    let mut registry = registry
        .write()
        .map_err(|e| MoabitError::LockPoisoned(e.to_string()))?;

    registry.remove(name)
}

/// List all registered parser names.
pub fn list_parsers() -> Result<Vec<String>> {
    use crate::plugins::registry::get_parser_registry;

    let registry = get_parser_registry();
    let registry = registry
        .read()
        .map_err(|e| MoabitError::LockPoisoned(e.to_string()))?;

    Ok(registry.list())
}

/// Shut down and remove every registered parser.
pub fn clear_parsers() -> Result<()> {
    use crate::plugins::registry::get_parser_registry;

    let registry = get_parser_registry();
    let mut registry = registry
        .write()
        .map_err(|e| MoabitError::LockPoisoned(e.to_string()))?;

    registry.shutdown_all()
}
