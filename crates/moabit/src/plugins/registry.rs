//! Parser registration and arbitration.
//!
//! The registry is the in-process stand-in for the host's arbitration: each
//! parser claims a set of MIME types with a weight, and lookups return the
//! heaviest claimant. Claims ending in `/*` match a whole top-level type,
//! which is how the media parser covers `video/*` and `audio/*` without
//! enumerating every container format.

use crate::plugins::DocumentParser;
use crate::{MoabitError, Result};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

/// Validate a plugin name before registration.
fn validate_plugin_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MoabitError::validation("Plugin name cannot be empty"));
    }

    if name.contains(char::is_whitespace) {
        return Err(MoabitError::validation(format!(
            "Plugin name '{}' cannot contain whitespace",
            name
        )));
    }

    Ok(())
}

/// Registry for document parser plugins.
///
/// # Thread Safety
///
/// The registry itself is plain data; share it behind the global
/// `RwLock` from [`get_parser_registry`].
pub struct ParserRegistry {
    parsers: HashMap<String, BTreeMap<i32, Arc<dyn DocumentParser>>>,
    name_index: HashMap<String, Vec<(String, i32)>>,
}

impl ParserRegistry {
    /// Create a new empty parser registry.
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
            name_index: HashMap::new(),
        }
    }

    /// Register a parser for every MIME type it claims.
    ///
    /// Calls `initialize()`; the parser is not registered when that fails.
    pub fn register(&mut self, parser: Arc<dyn DocumentParser>) -> Result<()> {
        let name = parser.name().to_string();
        let weight = parser.weight();
        let mime_types = parser.supported_mime_types();

        validate_plugin_name(&name)?;

        parser.initialize()?;

        let mut index_entries = Vec::new();

        for mime_type in mime_types {
            self.parsers
                .entry(mime_type.clone())
                .or_default()
                .insert(weight, Arc::clone(&parser));
            index_entries.push((mime_type, weight));
        }

        self.name_index.insert(name, index_entries);

        Ok(())
    }

    /// Get the heaviest parser claiming a MIME type.
    ///
    /// Exact claims win over `type/*` wildcard claims of any weight.
    pub fn get(&self, mime_type: &str) -> Result<Arc<dyn DocumentParser>> {
        if let Some(by_weight) = self.parsers.get(mime_type)
            && let Some((_weight, parser)) = by_weight.iter().next_back()
        {
            return Ok(Arc::clone(parser));
        }

        let mut best_match: Option<(i32, Arc<dyn DocumentParser>)> = None;

        for (claimed, by_weight) in &self.parsers {
            if claimed.ends_with("/*") {
                let prefix = &claimed[..claimed.len() - 1];
                if mime_type.starts_with(prefix)
                    && let Some((weight, parser)) = by_weight.iter().next_back()
                {
                    match &best_match {
                        None => best_match = Some((*weight, Arc::clone(parser))),
                        Some((current, _)) if weight > current => {
                            best_match = Some((*weight, Arc::clone(parser)));
                        }
                        Some(_) => {}
                    }
                }
            }
        }

        if let Some((_weight, parser)) = best_match {
            return Ok(parser);
        }

        Err(MoabitError::UnsupportedFormat(mime_type.to_string()))
    }

    /// List all registered parser names.
    pub fn list(&self) -> Vec<String> {
        self.name_index.keys().cloned().collect()
    }

    /// Remove a parser, calling `shutdown()` on it.
    ///
    /// Removing a name that was never registered is not an error.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let index_entries = match self.name_index.remove(name) {
            Some(entries) => entries,
            None => return Ok(()),
        };

        let mut parser_to_shutdown: Option<Arc<dyn DocumentParser>> = None;

        for (mime_type, weight) in index_entries {
            if let Some(by_weight) = self.parsers.get_mut(&mime_type) {
                if let Some(parser) = by_weight.remove(&weight)
                    && parser_to_shutdown.is_none()
                {
                    parser_to_shutdown = Some(parser);
                }

                if by_weight.is_empty() {
                    self.parsers.remove(&mime_type);
                }
            }
        }

        if let Some(parser) = parser_to_shutdown {
            parser.shutdown()?;
        }

        Ok(())
    }

    /// Shut down and remove every parser.
    pub fn shutdown_all(&mut self) -> Result<()> {
        let names: Vec<_> = self.name_index.keys().cloned().collect();
        for name in names {
            self.remove(&name)?;
        }
        Ok(())
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static PARSER_REGISTRY: Lazy<Arc<RwLock<ParserRegistry>>> =
    Lazy::new(|| Arc::new(RwLock::new(ParserRegistry::new())));

/// The global parser registry.
pub fn get_parser_registry() -> Arc<RwLock<ParserRegistry>> {
    Arc::clone(&PARSER_REGISTRY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::Plugin;
    use crate::types::ParsedMedia;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};

    struct StubParser {
        name: &'static str,
        claims: Vec<String>,
        weight: i32,
    }

    impl Plugin for StubParser {
        fn name(&self) -> &str {
            self.name
        }

        fn version(&self) -> String {
            "0.0.0".to_string()
        }

        fn initialize(&self) -> Result<()> {
            Ok(())
        }

        fn shutdown(&self) -> Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl DocumentParser for StubParser {
        async fn get_thumbnail(
            &self,
            _document_path: &Path,
            _mime_type: &str,
            _file_name: Option<&str>,
        ) -> Result<PathBuf> {
            Ok(PathBuf::from("thumb.webp"))
        }

        async fn parse(&self, _document_path: &Path, mime_type: &str, _file_name: Option<&str>) -> Result<ParsedMedia> {
            Ok(ParsedMedia::empty(mime_type))
        }

        fn supported_mime_types(&self) -> Vec<String> {
            self.claims.clone()
        }

        fn weight(&self) -> i32 {
            self.weight
        }
    }

    fn stub(name: &'static str, claims: &[&str], weight: i32) -> Arc<dyn DocumentParser> {
        Arc::new(StubParser {
            name,
            claims: claims.iter().map(|s| s.to_string()).collect(),
            weight,
        })
    }

    #[test]
    fn test_register_and_get_exact() {
        let mut registry = ParserRegistry::new();
        registry.register(stub("mp4-parser", &["video/mp4"], 0)).unwrap();

        let parser = registry.get("video/mp4").unwrap();
        assert_eq!(parser.name(), "mp4-parser");
        assert!(matches!(
            registry.get("video/x-matroska"),
            Err(MoabitError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_heaviest_parser_wins() {
        let mut registry = ParserRegistry::new();
        registry.register(stub("fallback", &["video/mp4"], -1)).unwrap();
        registry.register(stub("native", &["video/mp4"], 10)).unwrap();

        assert_eq!(registry.get("video/mp4").unwrap().name(), "native");
    }

    #[test]
    fn test_wildcard_claims() {
        let mut registry = ParserRegistry::new();
        registry.register(stub("media-fallback", &["video/*", "audio/*"], -1)).unwrap();

        assert_eq!(registry.get("video/x-flv").unwrap().name(), "media-fallback");
        assert_eq!(registry.get("audio/ogg").unwrap().name(), "media-fallback");
        assert!(registry.get("application/pdf").is_err());
    }

    #[test]
    fn test_exact_claim_beats_wildcard() {
        let mut registry = ParserRegistry::new();
        registry.register(stub("media-fallback", &["video/*"], 10)).unwrap();
        registry.register(stub("mp4-parser", &["video/mp4"], -1)).unwrap();

        assert_eq!(registry.get("video/mp4").unwrap().name(), "mp4-parser");
        assert_eq!(registry.get("video/webm").unwrap().name(), "media-fallback");
    }

    #[test]
    fn test_remove_clears_claims() {
        let mut registry = ParserRegistry::new();
        registry.register(stub("mp4-parser", &["video/mp4"], 0)).unwrap();
        registry.remove("mp4-parser").unwrap();

        assert!(registry.get("video/mp4").is_err());
        assert!(registry.list().is_empty());

        // Unknown names are fine.
        registry.remove("never-registered").unwrap();
    }

    #[test]
    fn test_rejects_invalid_names() {
        let mut registry = ParserRegistry::new();
        let err = registry.register(stub("bad name", &["video/mp4"], 0)).unwrap_err();
        assert!(matches!(err, MoabitError::Validation { .. }));
    }
}
