//! Thumbnail generation.
//!
//! Media files have no page to rasterize, so the pipeline gets one of two
//! things: a representative video frame when ffmpeg can produce one, or a
//! generated placeholder tile - a solid pastel square with the file's
//! extension as a centered label. Both are written as WebP into the parser's
//! scratch directory.

use crate::Result;
use crate::core::config::ThumbnailConfig;
use ab_glyph::{FontVec, PxScale};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rand::Rng;
use std::path::Path;
use tracing::warn;

#[cfg(feature = "video")]
pub mod video;

/// Common system locations probed when no font is configured.
const FONT_PROBE_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Label drawn on a placeholder tile: the filename's extension, uppercased,
/// falling back to the MIME subtype when there is no usable extension.
pub fn placeholder_label(file_name: Option<&str>, mime_type: &str) -> String {
    let extension = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty());

    match extension {
        Some(ext) => ext.to_uppercase(),
        None => mime_type.rsplit('/').next().unwrap_or(mime_type).to_uppercase(),
    }
}

/// Generate a random, visually pleasing background color.
///
/// Mid-range channels keep the tile pastel so either label color stays
/// readable.
fn pastel_color() -> Rgb<u8> {
    let mut rng = rand::rng();
    Rgb([
        rng.random_range(100..=200),
        rng.random_range(100..=200),
        rng.random_range(100..=200),
    ])
}

/// Black or white, whichever reads against the background brightness.
fn label_color(background: Rgb<u8>) -> Rgb<u8> {
    let brightness = background.0.iter().map(|&c| c as f32).sum::<f32>() / 3.0;
    if brightness > 150.0 {
        Rgb([0, 0, 0])
    } else {
        Rgb([255, 255, 255])
    }
}

fn load_font_file(path: &Path) -> Option<FontVec> {
    let bytes = std::fs::read(path).ok()?;
    FontVec::try_from_vec(bytes).ok()
}

/// Resolve the label font: the configured path first, then the probe list.
fn load_label_font(config: &ThumbnailConfig) -> Option<FontVec> {
    if let Some(path) = &config.font_path {
        if let Some(font) = load_font_file(path) {
            return Some(font);
        }
        warn!(path = %path.display(), "configured thumbnail font is not usable");
    }

    FONT_PROBE_PATHS.iter().find_map(|path| load_font_file(Path::new(path)))
}

/// Render a placeholder tile and write it as WebP.
///
/// A missing font degrades to an unlabeled tile; the thumbnail itself is
/// still produced.
pub fn render_placeholder(label: &str, config: &ThumbnailConfig, out_path: &Path) -> Result<()> {
    let size = config.size;
    let background = pastel_color();
    let mut img = RgbImage::from_pixel(size, size, background);

    if !label.is_empty()
        && let Some(font) = load_label_font(config)
    {
        // Scale the label down as it gets longer so it always fits the tile.
        let font_px = (size / (label.chars().count() as u32 + 2)).min(size / 3);
        let scale = PxScale::from(font_px as f32);
        let (text_width, text_height) = text_size(scale, &font, label);

        let x = (size as i32 - text_width as i32).max(0) / 2;
        let y = (size as i32 - text_height as i32).max(0) / 2;

        draw_text_mut(&mut img, label_color(background), x, y, scale, &font, label);
    } else if !label.is_empty() {
        warn!("no usable thumbnail font found, emitting unlabeled tile");
    }

    img.save_with_format(out_path, ImageFormat::WebP)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_label_prefers_filename_extension() {
        assert_eq!(placeholder_label(Some("demo.afdesign"), "application/octet-stream"), "AFDESIGN");
        assert_eq!(placeholder_label(Some("clip.mp4"), "video/mp4"), "MP4");
    }

    #[test]
    fn test_placeholder_label_falls_back_to_subtype() {
        assert_eq!(placeholder_label(Some("no_extension"), "video/x-matroska"), "X-MATROSKA");
        assert_eq!(placeholder_label(None, "audio/flac"), "FLAC");
    }

    #[test]
    fn test_label_color_threshold() {
        assert_eq!(label_color(Rgb([200, 200, 200])), Rgb([0, 0, 0]));
        assert_eq!(label_color(Rgb([100, 100, 100])), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_pastel_color_stays_mid_range() {
        for _ in 0..64 {
            let Rgb([r, g, b]) = pastel_color();
            for channel in [r, g, b] {
                assert!((100..=200).contains(&channel));
            }
        }
    }

    #[test]
    fn test_render_placeholder_writes_decodable_webp() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("thumb.webp");
        let config = ThumbnailConfig::default();

        render_placeholder("MKV", &config, &out_path).unwrap();

        let img = image::open(&out_path).unwrap();
        assert_eq!(img.width(), config.size);
        assert_eq!(img.height(), config.size);
    }
}
