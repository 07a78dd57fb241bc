//! The media parser and its consumer declaration.
//!
//! [`MediaParser`] is the fallback parser for everything the host's native
//! parsers cannot handle: video, audio, and arbitrary binary uploads. It
//! never rejects a document - the worst case is an unlabeled placeholder
//! thumbnail and an empty excerpt.

use crate::core::config::MediaConfig;
use crate::core::mime::is_video_mime;
use crate::core::table::MimeTypeTable;
use crate::extraction::text::{is_skipped_mime, sniff_excerpt};
use crate::plugins::{DocumentParser, Plugin};
use crate::thumbnail::{placeholder_label, render_placeholder};
use crate::types::ParsedMedia;
use crate::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

/// Arbitration weight of the media parser. Negative: every native parser
/// the host ships should win a contested MIME type.
pub const MEDIA_PARSER_WEIGHT: i32 = -1;

/// Fallback parser for media and generic binary documents.
pub struct MediaParser {
    config: MediaConfig,
    scratch: TempDir,
}

impl MediaParser {
    /// Create a parser with its own scratch directory for thumbnails.
    pub fn new(config: MediaConfig) -> Result<Self> {
        let scratch = TempDir::new()?;
        Ok(Self { config, scratch })
    }

    /// The scratch directory generated thumbnails are written into.
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    async fn read_head(&self, document_path: &Path) -> Result<Vec<u8>> {
        let file = tokio::fs::File::open(document_path).await?;
        let mut head = Vec::with_capacity(self.config.excerpt.max_bytes);
        file.take(self.config.excerpt.max_bytes as u64)
            .read_to_end(&mut head)
            .await?;
        Ok(head)
    }
}

impl Plugin for MediaParser {
    fn name(&self) -> &str {
        "media-parser"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    fn description(&self) -> &str {
        "Thumbnails and search excerpts for video, audio, and binary uploads"
    }
}

#[async_trait]
impl DocumentParser for MediaParser {
    /// Thumbnail the document: a representative video frame when possible,
    /// the placeholder tile otherwise. Only a broken scratch directory makes
    /// this return an error.
    async fn get_thumbnail(
        &self,
        document_path: &Path,
        mime_type: &str,
        file_name: Option<&str>,
    ) -> Result<PathBuf> {
        let out_path = self.scratch.path().join("thumb.webp");

        #[cfg(feature = "video")]
        if is_video_mime(mime_type) {
            match crate::thumbnail::video::extract_frame(document_path, &self.config.thumbnail, &out_path).await {
                Ok(path) => return Ok(path),
                Err(crate::MoabitError::MissingDependency(tool)) => {
                    warn!(tool = %tool, "video tooling not installed, falling back to placeholder tile");
                }
                Err(err) => {
                    warn!(error = %err, "failed to extract video frame, falling back to placeholder tile");
                }
            }
        }

        #[cfg(not(feature = "video"))]
        let _ = is_video_mime(mime_type);

        let label = placeholder_label(file_name, mime_type);
        render_placeholder(&label, &self.config.thumbnail, &out_path)?;
        Ok(out_path)
    }

    /// Extract the indexable excerpt. I/O problems degrade to empty text -
    /// this parser enriches the index, it does not gate ingestion.
    async fn parse(&self, document_path: &Path, mime_type: &str, file_name: Option<&str>) -> Result<ParsedMedia> {
        if is_skipped_mime(mime_type) {
            return Ok(ParsedMedia::empty(mime_type));
        }

        let head = match self.read_head(document_path).await {
            Ok(head) => head,
            Err(err) => {
                let shown = file_name
                    .map(str::to_string)
                    .unwrap_or_else(|| document_path.display().to_string());
                warn!(file = %shown, error = %err, "failed to read document head");
                return Ok(ParsedMedia::empty(mime_type));
            }
        };

        let text = sniff_excerpt(&head, mime_type, self.config.excerpt.min_words);
        Ok(ParsedMedia {
            text,
            mime_type: mime_type.to_string(),
        })
    }

    fn supported_mime_types(&self) -> Vec<String> {
        MimeTypeTable::load(&self.config.sidecar_path)
            .into_entries()
            .into_keys()
            .collect()
    }

    fn weight(&self) -> i32 {
        MEDIA_PARSER_WEIGHT
    }
}

type ParserFactory = Box<dyn Fn() -> Result<Box<dyn DocumentParser>> + Send + Sync>;

/// What the registration hook hands the host: a parser factory, the
/// arbitration weight, and the MIME types the parser claims together with
/// their round-trip extensions.
pub struct ConsumerDeclaration {
    pub weight: i32,
    pub mime_types: IndexMap<String, String>,
    factory: ParserFactory,
}

impl ConsumerDeclaration {
    /// Instantiate a parser for one document's consumption.
    pub fn new_parser(&self) -> Result<Box<dyn DocumentParser>> {
        (self.factory)()
    }
}

impl std::fmt::Debug for ConsumerDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerDeclaration")
            .field("weight", &self.weight)
            .field("mime_types", &self.mime_types.len())
            .finish()
    }
}

/// Registration hook: describe this plugin to the host.
///
/// The MIME table is loaded fresh so types synthesized since the last
/// declaration are claimed too.
pub fn media_consumer_declaration(config: &MediaConfig) -> ConsumerDeclaration {
    let table = MimeTypeTable::load(&config.sidecar_path);
    debug!(mime_types = table.len(), weight = MEDIA_PARSER_WEIGHT, "declaring media consumer");

    let factory_config = config.clone();
    ConsumerDeclaration {
        weight: MEDIA_PARSER_WEIGHT,
        mime_types: table.into_entries(),
        factory: Box::new(move || Ok(Box::new(MediaParser::new(factory_config.clone())?))),
    }
}
