//! Error types for Moabit.
//!
//! All fallible operations in the library return [`Result`], built on
//! [`MoabitError`]. The error philosophy mirrors what the plugin is for:
//! best-effort enrichment of somebody else's ingestion pipeline.
//!
//! **System errors bubble up unchanged:**
//! - `MoabitError::Io` (from `std::io::Error`) - file system and permission
//!   problems the operator needs to see.
//!
//! **Application errors are wrapped with context:**
//! - `Parsing` - undecodable media, malformed side-file content
//! - `ImageProcessing` - thumbnail drawing or encoding failures
//! - `Validation` - invalid configuration or parameters
//! - `MissingDependency` - ffmpeg/ffprobe or fonts not installed
//!
//! The host-facing entry points (`parse`, `get_thumbnail` fallback, the
//! pre-save hook) catch these, log them, and degrade to a safe default;
//! see the crate-level docs.
use thiserror::Error;

/// Result type alias using `MoabitError`.
pub type Result<T> = std::result::Result<T, MoabitError>;

/// Main error type for all Moabit operations.
#[derive(Debug, Error)]
pub enum MoabitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Image processing error: {message}")]
    ImageProcessing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Plugin error in '{plugin_name}': {message}")]
    Plugin { message: String, plugin_name: String },

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for MoabitError {
    fn from(err: toml::de::Error) -> Self {
        MoabitError::Validation {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<image::ImageError> for MoabitError {
    fn from(err: image::ImageError) -> Self {
        MoabitError::ImageProcessing {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $with_source:ident, $variant:ident) => {
        /// Create the error from a message.
        pub fn $name<S: Into<String>>(message: S) -> Self {
            Self::$variant {
                message: message.into(),
                source: None,
            }
        }

        /// Create the error from a message and an underlying source.
        pub fn $with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
            message: S,
            source: E,
        ) -> Self {
            Self::$variant {
                message: message.into(),
                source: Some(Box::new(source)),
            }
        }
    };
}

impl MoabitError {
    error_constructor!(parsing, parsing_with_source, Parsing);
    error_constructor!(image_processing, image_processing_with_source, ImageProcessing);
    error_constructor!(validation, validation_with_source, Validation);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MoabitError = io_err.into();
        assert!(matches!(err, MoabitError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_parsing_error() {
        let err = MoabitError::parsing("invalid frame data");
        assert_eq!(err.to_string(), "Parsing error: invalid frame data");
    }

    #[test]
    fn test_parsing_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad data");
        let err = MoabitError::parsing_with_source("invalid frame data", source);
        assert_eq!(err.to_string(), "Parsing error: invalid frame data");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_validation_error() {
        let err = MoabitError::validation("invalid input");
        assert_eq!(err.to_string(), "Validation error: invalid input");
    }

    #[test]
    fn test_missing_dependency_display() {
        let err = MoabitError::MissingDependency("ffmpeg".to_string());
        assert_eq!(err.to_string(), "Missing dependency: ffmpeg");
    }
}
