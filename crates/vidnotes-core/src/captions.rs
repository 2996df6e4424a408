//! Direct transcript retrieval from the video host's caption tracks.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, process::Command};

use crate::{
    error::CaptionError,
    types::{Transcript, TranscriptOrigin, VideoReference},
};

/// Anything that can return the caption lines of a video, in order.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    async fn fetch(
        &self,
        video: &VideoReference,
        scratch_dir: &Path,
    ) -> Result<Vec<String>, CaptionError>;
}

/// Fetch the transcript for `video`, or `None` when no usable captions exist.
///
/// Every failure folds to `None`: the caller always has the speech
/// recognition path to fall back on.
pub async fn resolve(
    source: &dyn CaptionSource,
    video: &VideoReference,
    scratch_dir: &Path,
) -> Option<Transcript> {
    match source.fetch(video, scratch_dir).await {
        Ok(lines) => {
            let transcript = Transcript::new(TranscriptOrigin::Captions, lines);
            if transcript.is_empty() {
                tracing::info!(video = %video, "caption track is empty");
                return None;
            }
            tracing::info!(video = %video, lines = transcript.segments.len(), "fetched captions");
            Some(transcript)
        }
        Err(CaptionError::NotFound) => {
            tracing::info!(video = %video, "no captions available");
            None
        }
        Err(e) => {
            tracing::info!(video = %video, error = %e, "caption fetch failed, falling back");
            None
        }
    }
}

/// Caption tracks via `yt-dlp`, manual subtitles preferred over
/// auto-generated ones.
pub struct YtDlpCaptions {
    langs: String,
}

impl YtDlpCaptions {
    pub fn new(langs: impl Into<String>) -> Self {
        Self {
            langs: langs.into(),
        }
    }
}

#[async_trait]
impl CaptionSource for YtDlpCaptions {
    async fn fetch(
        &self,
        video: &VideoReference,
        scratch_dir: &Path,
    ) -> Result<Vec<String>, CaptionError> {
        let captions_dir = scratch_dir.join("captions");
        fs::create_dir_all(&captions_dir).await?;
        let output_template = captions_dir.join("%(id)s.%(ext)s");

        tracing::debug!(video = %video, langs = %self.langs, "yt-dlp caption fetch");
        let output = Command::new("yt-dlp")
            .arg("--skip-download")
            .arg("--write-subs")
            .arg("--write-auto-subs")
            .arg("--sub-langs")
            .arg(&self.langs)
            .arg("--sub-format")
            .arg("vtt")
            .arg("--no-playlist")
            .arg("--no-warnings")
            .arg("-o")
            .arg(&output_template)
            .arg(video.watch_url())
            .output()
            .await?;

        if !output.status.success() {
            return Err(CaptionError::Provider(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let Some(vtt_path) = find_vtt(&captions_dir).await? else {
            return Err(CaptionError::NotFound);
        };

        let vtt = fs::read_to_string(&vtt_path).await?;
        let lines = parse_vtt(&vtt);
        if lines.is_empty() {
            return Err(CaptionError::NotFound);
        }
        Ok(lines)
    }
}

async fn find_vtt(dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut found = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "vtt") {
            found.push(path);
        }
    }
    found.sort();
    Ok(found.into_iter().next())
}

/// Turn a WebVTT document into caption lines.
///
/// Timing lines, cue ids (any line directly followed by a timing line),
/// header/NOTE/STYLE blocks and inline tags are dropped. Consecutive repeats
/// are collapsed, since auto-generated tracks roll each line through two
/// cues.
pub fn parse_vtt(vtt: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut skipping_block = false;
    let mut raw_lines = vtt.lines().peekable();

    while let Some(raw) = raw_lines.next() {
        let line = raw.trim();

        if line.is_empty() {
            skipping_block = false;
            continue;
        }
        if skipping_block {
            continue;
        }
        if line.starts_with("WEBVTT")
            || line.starts_with("NOTE")
            || line.starts_with("STYLE")
            || line.starts_with("REGION")
        {
            skipping_block = true;
            continue;
        }
        if line.contains("-->") {
            continue;
        }
        // cue identifier, only when a timing line follows
        if raw_lines.peek().is_some_and(|next| next.contains("-->")) {
            continue;
        }

        let text = decode_entities(&strip_tags(line));
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() || lines.last() == Some(&text) {
            continue;
        }
        lines.push(text);
    }

    lines
}

fn strip_tags(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_tag = false;
    for c in line.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
