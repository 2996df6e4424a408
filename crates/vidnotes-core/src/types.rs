use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Video identifier extracted from a URL. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoReference(String);

impl VideoReference {
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let id = id.trim();
        if id.is_empty() {
            None
        } else {
            Some(Self(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }

    pub fn thumbnail_url(&self) -> String {
        format!("https://img.youtube.com/vi/{}/hqdefault.jpg", self.0)
    }
}

impl fmt::Display for VideoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriptOrigin {
    /// Caption track fetched from the video host, one segment per cue.
    Captions,
    /// Local speech recognition, one segment per recognized audio span.
    Whisper,
}

impl TranscriptOrigin {
    fn separator(self) -> &'static str {
        match self {
            TranscriptOrigin::Captions => "\n",
            TranscriptOrigin::Whisper => " ",
        }
    }
}

impl fmt::Display for TranscriptOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptOrigin::Captions => write!(f, "captions"),
            TranscriptOrigin::Whisper => write!(f, "whisper"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub origin: TranscriptOrigin,
    pub segments: Vec<String>,
}

impl Transcript {
    pub fn new(origin: TranscriptOrigin, segments: Vec<String>) -> Self {
        Self { origin, segments }
    }

    /// Flatten segments into one string. Captions join with newlines,
    /// recognized spans with single spaces.
    pub fn text(&self) -> String {
        self.segments.join(self.origin.separator())
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub channel: String,
    pub thumbnail_url: Option<String>,
    pub description: String,
    pub audio_path: Option<PathBuf>,
}

impl VideoMetadata {
    pub const DESCRIPTION_LIMIT: usize = 300;

    /// Placeholder metadata used when captions were fetched without
    /// downloading anything.
    pub fn for_reference(video: &VideoReference) -> Self {
        Self {
            title: format!("YouTube Video {}", video),
            channel: "Unknown".to_string(),
            thumbnail_url: Some(video.thumbnail_url()),
            description: String::new(),
            audio_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub text: String,
    pub chunk_count: usize,
}

impl Report {
    pub const HEADER: &'static str = "### Video Summary Report";

    pub(crate) fn new(body: &str, chunk_count: usize) -> Self {
        Self {
            text: format!("{}\n\n{}", Self::HEADER, body.trim()),
            chunk_count,
        }
    }

    pub fn is_chunked(&self) -> bool {
        self.chunk_count > 0
    }
}
