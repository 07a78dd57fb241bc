//! Moabit - media ingestion companion for document management pipelines.
//!
//! Document management systems rasterize a page for the thumbnail and run
//! format-aware parsers for the search index. Video, audio, and arbitrary
//! binary uploads have neither a page nor a parser; Moabit is the fallback
//! that keeps them first-class citizens anyway:
//!
//! - **Thumbnails**: a representative video frame when ffmpeg is installed,
//!   otherwise a generated placeholder tile with the file's extension.
//! - **Search excerpts**: a small, heuristically-validated text excerpt
//!   sniffed from the file head, so garbage bytes never reach the index.
//! - **MIME round-tripping**: a MIME-type-to-extension table, extended at
//!   runtime with synthesized types, so stored files download with the
//!   extension they were uploaded with.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use moabit::plugins::DocumentParser;
//! use moabit::{MediaConfig, media_consumer_declaration};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> moabit::Result<()> {
//! let config = MediaConfig::default();
//! let declaration = media_consumer_declaration(&config);
//!
//! let parser = declaration.new_parser()?;
//! let thumb = parser.get_thumbnail("upload.mkv".as_ref(), "video/x-matroska", Some("upload.mkv")).await?;
//! println!("thumbnail at {}", thumb.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core** (`core`): configuration, MIME tables, the generated side file
//! - **Plugin system** (`plugins`): parser contract and weight arbitration
//! - **Consumer** (`consumer`): the media parser and its declaration
//! - **Hooks** (`hooks`): pre-save MIME type correction
//!
//! Everything is best-effort by design: failures are logged and degrade to a
//! safe default (placeholder tile, empty excerpt, unmodified record) instead
//! of propagating into the host's ingestion pipeline.

#![deny(unsafe_code)]

pub mod consumer;
pub mod core;
pub mod error;
pub mod extraction;
pub mod hooks;
pub mod plugins;
pub mod thumbnail;
pub mod types;

pub use error::{MoabitError, Result};
pub use types::*;

pub use consumer::{ConsumerDeclaration, MEDIA_PARSER_WEIGHT, MediaParser, media_consumer_declaration};

pub use core::config::{ExcerptConfig, MediaConfig, ThumbnailConfig};

pub use core::mime::{
    FLAC_MIME_TYPE, MATROSKA_MIME_TYPE, MP3_MIME_TYPE, MP4_MIME_TYPE, OCTET_STREAM_MIME_TYPE, OGG_MIME_TYPE,
    QUICKTIME_MIME_TYPE, WAV_MIME_TYPE, WEBM_MIME_TYPE, builtin_mime_types, detect_mime_type, is_audio_mime,
    is_image_mime, is_text_mime, is_video_mime,
};

pub use core::table::MimeTypeTable;

pub use hooks::{EXCLUDED_EXTENSIONS, correct_mime_type};

pub use plugins::registry::get_parser_registry;
