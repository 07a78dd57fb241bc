//! Representative frame extraction through ffmpeg.
//!
//! ffmpeg and ffprobe are optional runtime dependencies. Every failure mode
//! here - binaries not installed, undecodable stream, timeout - is reported
//! as an error and the caller falls back to the placeholder tile.

use crate::core::config::ThumbnailConfig;
use crate::{MoabitError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{Duration, timeout};
use tracing::debug;

const FFPROBE_TIMEOUT_SECONDS: u64 = 15;

/// Timestamp to grab the frame at: the configured offset, or the midpoint
/// for clips shorter than twice that.
fn frame_timestamp(duration: f64, configured_seconds: f64) -> f64 {
    configured_seconds.min(duration / 2.0)
}

async fn run_tool(mut command: Command, tool: &str, timeout_seconds: u64) -> Result<std::process::Output> {
    let child = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => MoabitError::MissingDependency(tool.to_string()),
            _ => MoabitError::Io(e),
        })?;

    match timeout(Duration::from_secs(timeout_seconds), child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(std::io::Error::other(format!("Failed to wait for {}: {}", tool, e)).into()),
        Err(_) => Err(MoabitError::parsing(format!(
            "{} timed out after {} seconds",
            tool, timeout_seconds
        ))),
    }
}

/// Container duration in seconds, via ffprobe.
async fn probe_duration(path: &Path) -> Result<f64> {
    let mut command = Command::new("ffprobe");
    command
        .arg("-v")
        .arg("error")
        .arg("-show_entries")
        .arg("format=duration")
        .arg("-of")
        .arg("default=noprint_wrappers=1:nokey=1")
        .arg(path);

    let output = run_tool(command, "ffprobe", FFPROBE_TIMEOUT_SECONDS).await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MoabitError::parsing(format!("ffprobe failed: {}", stderr.trim())));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .trim()
        .parse::<f64>()
        .map_err(|e| MoabitError::parsing(format!("ffprobe reported no parsable duration: {}", e)))
}

/// Extract one representative frame, downscale it to fit the thumbnail box,
/// and write it as WebP to `out_path`.
pub async fn extract_frame(document_path: &Path, config: &ThumbnailConfig, out_path: &Path) -> Result<PathBuf> {
    let duration = probe_duration(document_path).await?;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(MoabitError::parsing("video reports no usable duration".to_string()));
    }

    let seek = frame_timestamp(duration, config.video_frame_seconds);
    debug!(path = %document_path.display(), seek, "extracting video frame");

    let frame_path = out_path.with_extension("png");
    let mut command = Command::new("ffmpeg");
    command
        .arg("-nostdin")
        .arg("-ss")
        .arg(format!("{:.3}", seek))
        .arg("-i")
        .arg(document_path)
        .arg("-frames:v")
        .arg("1")
        .arg("-y")
        .arg(&frame_path);

    let output = run_tool(command, "ffmpeg", config.ffmpeg_timeout_seconds).await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MoabitError::parsing(format!(
            "ffmpeg frame extraction failed: {}",
            stderr.trim()
        )));
    }

    let frame = image::open(&frame_path)?;
    let thumb = frame.thumbnail(config.size, config.size);
    thumb.to_rgb8().save_with_format(out_path, image::ImageFormat::WebP)?;

    let _ = std::fs::remove_file(&frame_path);

    Ok(out_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_timestamp_long_clip_uses_offset() {
        assert_eq!(frame_timestamp(600.0, 30.0), 30.0);
    }

    #[test]
    fn test_frame_timestamp_short_clip_uses_midpoint() {
        assert_eq!(frame_timestamp(10.0, 30.0), 5.0);
    }

    #[test]
    fn test_frame_timestamp_exact_boundary() {
        assert_eq!(frame_timestamp(60.0, 30.0), 30.0);
    }
}
