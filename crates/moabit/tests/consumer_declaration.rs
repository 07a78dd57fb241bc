//! Consumer declaration and arbitration integration tests.
//!
//! The declaration is the registration hook's payload: weight, claimed MIME
//! types with their round-trip extensions, and a working parser factory.

use moabit::plugins::registry::ParserRegistry;
use moabit::plugins::{DocumentParser, Plugin};
use moabit::{MEDIA_PARSER_WEIGHT, MediaConfig, MediaParser, media_consumer_declaration};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_declaration_shape() {
    let declaration = media_consumer_declaration(&MediaConfig::default());

    assert_eq!(declaration.weight, MEDIA_PARSER_WEIGHT);
    assert!(declaration.mime_types.len() > 20);
    assert_eq!(
        declaration.mime_types.get("video/x-matroska").map(String::as_str),
        Some(".mkv")
    );

    // The table serializes in insertion order, built-ins first.
    let json = serde_json::to_string(&declaration.mime_types).unwrap();
    assert!(json.starts_with("{\"video/mp4\":\".mp4\""));
}

#[test]
fn test_declaration_claims_generated_types() {
    let dir = TempDir::new().expect("Should create temp dir");
    let sidecar_path = dir.path().join("generated.mime-types");
    std::fs::write(&sidecar_path, "application/octet-stream-afpub: .afpub\n").unwrap();

    let config = MediaConfig {
        sidecar_path,
        ..MediaConfig::default()
    };

    let declaration = media_consumer_declaration(&config);
    assert_eq!(
        declaration.mime_types.get("application/octet-stream-afpub").map(String::as_str),
        Some(".afpub")
    );
}

#[tokio::test]
async fn test_factory_produces_working_parser() {
    let dir = TempDir::new().expect("Should create temp dir");
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "storyboard: five shots, two locations, one take").unwrap();

    let declaration = media_consumer_declaration(&MediaConfig::default());
    let parser = declaration.new_parser().unwrap();

    let parsed = parser.parse(&path, "text/plain", Some("notes.txt")).await.unwrap();
    assert_eq!(parsed.text, "storyboard: five shots, two locations, one take");
}

#[test]
fn test_media_parser_loses_contested_mime_types() {
    let mut registry = ParserRegistry::new();
    let media = Arc::new(MediaParser::new(MediaConfig::default()).unwrap());
    registry.register(media).unwrap();

    // The media parser answers for its claims...
    assert_eq!(registry.get("video/mp4").unwrap().name(), "media-parser");

    // ...but any native parser at default weight outranks it.
    struct NativeMp4;

    impl Plugin for NativeMp4 {
        fn name(&self) -> &str {
            "native-mp4"
        }
        fn version(&self) -> String {
            "1.0.0".to_string()
        }
        fn initialize(&self) -> moabit::Result<()> {
            Ok(())
        }
        fn shutdown(&self) -> moabit::Result<()> {
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl DocumentParser for NativeMp4 {
        async fn get_thumbnail(
            &self,
            _path: &std::path::Path,
            _mime_type: &str,
            _file_name: Option<&str>,
        ) -> moabit::Result<std::path::PathBuf> {
            unimplemented!("not exercised")
        }

        async fn parse(
            &self,
            _path: &std::path::Path,
            mime_type: &str,
            _file_name: Option<&str>,
        ) -> moabit::Result<moabit::ParsedMedia> {
            Ok(moabit::ParsedMedia::empty(mime_type))
        }

        fn supported_mime_types(&self) -> Vec<String> {
            vec!["video/mp4".to_string()]
        }
    }

    registry.register(Arc::new(NativeMp4)).unwrap();
    assert_eq!(registry.get("video/mp4").unwrap().name(), "native-mp4");
}
