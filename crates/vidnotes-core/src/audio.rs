use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::{
    cache::get_audio_path,
    error::{Result, VidnotesError},
    types::VideoMetadata,
};

/// Downloads the audio track of a video together with its metadata.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn acquire(&self, url: &str, run_dir: &Path) -> Result<VideoMetadata>;
}

/// Subset of the yt-dlp info document we care about
#[derive(Debug, Deserialize)]
struct VideoInfo {
    id: String,
    title: Option<String>,
    uploader: Option<String>,
    channel: Option<String>,
    thumbnail: Option<String>,
    description: Option<String>,
}

/// Best-available audio via `yt-dlp`, transcoded to 192 kbps MP3.
pub struct YtDlpAudio;

#[async_trait]
impl MediaSource for YtDlpAudio {
    async fn acquire(&self, url: &str, run_dir: &Path) -> Result<VideoMetadata> {
        let output_template = run_dir.join("%(id)s.%(ext)s");

        tracing::debug!(url, run_dir = %run_dir.display(), "yt-dlp audio download");
        let output = Command::new("yt-dlp")
            .arg(url)
            .arg("-f")
            .arg("bestaudio/best")
            .arg("--extract-audio")
            .arg("--audio-format")
            .arg("mp3")
            .arg("--audio-quality")
            .arg("192K")
            .arg("--no-playlist")
            .arg("--no-simulate")
            .arg("--dump-json")
            .arg("--quiet")
            .arg("-o")
            .arg(&output_template)
            .output()
            .await?;

        if !output.status.success() {
            return Err(VidnotesError::DownloadFailed {
                url: url.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let metadata = parse_metadata(url, &stdout, run_dir)?;

        match &metadata.audio_path {
            Some(path) if path.exists() => Ok(metadata),
            _ => Err(VidnotesError::DownloadFailed {
                url: url.to_string(),
                reason: "yt-dlp finished without producing an audio file".to_string(),
            }),
        }
    }
}

/// Build metadata from the info JSON yt-dlp prints. The audio file is
/// expected at `<run_dir>/<id>.mp3`.
fn parse_metadata(url: &str, stdout: &str, run_dir: &Path) -> Result<VideoMetadata> {
    let info_line = stdout
        .lines()
        .rev()
        .find(|l| l.trim_start().starts_with('{'))
        .ok_or_else(|| VidnotesError::DownloadFailed {
            url: url.to_string(),
            reason: "yt-dlp printed no video info".to_string(),
        })?;
    let info: VideoInfo = serde_json::from_str(info_line)?;

    let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());

    Ok(VideoMetadata {
        title: non_empty(info.title).unwrap_or_else(|| "Untitled Video".to_string()),
        channel: non_empty(info.uploader)
            .or(non_empty(info.channel))
            .unwrap_or_else(|| "Unknown".to_string()),
        thumbnail_url: non_empty(info.thumbnail),
        description: info
            .description
            .unwrap_or_default()
            .chars()
            .take(VideoMetadata::DESCRIPTION_LIMIT)
            .collect(),
        audio_path: Some(get_audio_path(run_dir, &info.id)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata() {
        let stdout = r#"{"id": "abc123", "title": "Rust in 100 Seconds", "uploader": "Fireship", "thumbnail": "https://i.ytimg.com/vi/abc123/maxresdefault.webp", "description": "Short intro", "duration": 150}"#;
        let meta = parse_metadata("https://youtu.be/abc123", stdout, Path::new("/tmp/run")).unwrap();

        assert_eq!(meta.title, "Rust in 100 Seconds");
        assert_eq!(meta.channel, "Fireship");
        assert_eq!(
            meta.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/abc123/maxresdefault.webp")
        );
        assert_eq!(meta.description, "Short intro");
        assert_eq!(
            meta.audio_path.as_deref(),
            Some(Path::new("/tmp/run/abc123.mp3"))
        );
    }

    #[test]
    fn test_parse_metadata_defaults_and_truncation() {
        let long = "é".repeat(500);
        let stdout = format!(
            "[download] noise\n{}\n",
            serde_json::json!({"id": "x", "title": "", "description": long})
        );
        let meta = parse_metadata("u", &stdout, Path::new("/tmp")).unwrap();

        assert_eq!(meta.title, "Untitled Video");
        assert_eq!(meta.channel, "Unknown");
        assert!(meta.thumbnail_url.is_none());
        assert_eq!(meta.description.chars().count(), 300);
    }

    #[test]
    fn test_parse_metadata_falls_back_to_channel() {
        let stdout = r#"{"id": "x", "channel": "Some Channel"}"#;
        let meta = parse_metadata("u", stdout, Path::new("/tmp")).unwrap();
        assert_eq!(meta.channel, "Some Channel");
        assert_eq!(meta.description, "");
    }

    #[test]
    fn test_parse_metadata_without_info_fails() {
        let err = parse_metadata("https://youtu.be/x", "", Path::new("/tmp")).unwrap_err();
        assert!(matches!(err, VidnotesError::DownloadFailed { .. }));
    }
}
