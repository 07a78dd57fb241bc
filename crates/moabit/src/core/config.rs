//! Configuration loading and management.
//!
//! `MediaConfig` covers the few knobs this plugin has. It can be loaded from
//! a `moabit.toml` discovered in the project hierarchy, from an explicit TOML
//! file, or constructed programmatically. Every field has a default, so an
//! empty file and no file behave the same.

use crate::{MoabitError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Plugin configuration.
///
/// # Example
///
/// ```rust
/// use moabit::MediaConfig;
///
/// // Defaults
/// let config = MediaConfig::default();
/// assert_eq!(config.thumbnail.size, 400);
///
/// // From TOML
/// // let config = MediaConfig::from_toml_file("moabit.toml")?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path of the generated MIME type side file.
    #[serde(default = "default_sidecar_path")]
    pub sidecar_path: PathBuf,

    /// Thumbnail rendering options.
    #[serde(default)]
    pub thumbnail: ThumbnailConfig,

    /// Text excerpt options.
    #[serde(default)]
    pub excerpt: ExcerptConfig,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            sidecar_path: default_sidecar_path(),
            thumbnail: ThumbnailConfig::default(),
            excerpt: ExcerptConfig::default(),
        }
    }
}

/// Thumbnail rendering options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    /// Square edge length of generated thumbnails, in pixels.
    #[serde(default = "default_thumbnail_size")]
    pub size: u32,

    /// TTF font used for the placeholder label. When unset, a list of common
    /// system font locations is probed; when none is usable the tile is
    /// rendered without a label.
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    /// Video timestamp to grab the representative frame at. Clips shorter
    /// than twice this value use their midpoint instead.
    #[serde(default = "default_video_frame_seconds")]
    pub video_frame_seconds: f64,

    /// Hard timeout for ffmpeg/ffprobe invocations.
    #[serde(default = "default_ffmpeg_timeout_seconds")]
    pub ffmpeg_timeout_seconds: u64,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            size: default_thumbnail_size(),
            font_path: None,
            video_frame_seconds: default_video_frame_seconds(),
            ffmpeg_timeout_seconds: default_ffmpeg_timeout_seconds(),
        }
    }
}

/// Text excerpt options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcerptConfig {
    /// How much of the file head to sniff for text.
    #[serde(default = "default_excerpt_max_bytes")]
    pub max_bytes: usize,

    /// Minimum word-like tokens for a non-text MIME type's excerpt to count
    /// as real text.
    #[serde(default = "default_excerpt_min_words")]
    pub min_words: usize,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_excerpt_max_bytes(),
            min_words: default_excerpt_min_words(),
        }
    }
}

fn default_sidecar_path() -> PathBuf {
    PathBuf::from("generated.mime-types")
}

fn default_thumbnail_size() -> u32 {
    400
}

fn default_video_frame_seconds() -> f64 {
    30.0
}

fn default_ffmpeg_timeout_seconds() -> u64 {
    60
}

fn default_excerpt_max_bytes() -> usize {
    5000
}

fn default_excerpt_min_words() -> usize {
    5
}

impl MediaConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(MoabitError::Io)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Discover a `moabit.toml` by walking up from the working directory.
    ///
    /// Returns `Ok(None)` when no config file exists anywhere up the tree.
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(MoabitError::Io)?;

        loop {
            let moabit_toml = current.join("moabit.toml");
            if moabit_toml.exists() {
                return Ok(Some(Self::from_toml_file(moabit_toml)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }
}
