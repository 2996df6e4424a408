#![allow(dead_code)]

use std::{
    path::Path,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use vidnotes_core::{
    CaptionError, CaptionSource, GenerationError, MediaSource, Recognizer, Transcript,
    TranscriptOrigin, VideoMetadata, VideoReference, VidnotesError,
};

pub const REPORT_BODY: &str = "## Introduction\nAn overview [00:12] of the talk.\n\n## Main Points\n### Greetings\n- Hello (01:02:03) world\n\n## Key Takeaways\n- Say hello";

type Respond = Box<dyn Fn(&str) -> Result<String, GenerationError> + Send + Sync>;

/// Generator fake that records every prompt it receives.
pub struct FakeGenerator {
    pub prompts: Mutex<Vec<String>>,
    respond: Respond,
}

impl FakeGenerator {
    pub fn new(
        respond: impl Fn(&str) -> Result<String, GenerationError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Chunk prompts get a numbered bullet in call order; every other prompt
    /// gets [`REPORT_BODY`].
    pub fn echoing() -> Self {
        let counter = AtomicUsize::new(0);
        Self::new(move |prompt| {
            if is_chunk_prompt(prompt) {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                Ok(format!("- summary of chunk {n}"))
            } else {
                Ok(REPORT_BODY.to_string())
            }
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl vidnotes_core::Generator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.respond)(prompt)
    }
}

pub fn is_chunk_prompt(prompt: &str) -> bool {
    prompt.starts_with("Summarize this part of the transcript")
}

pub enum CaptionBehavior {
    Lines(Vec<String>),
    NotFound,
    ProviderError,
}

pub struct FakeCaptions {
    pub behavior: CaptionBehavior,
    pub calls: AtomicUsize,
}

impl FakeCaptions {
    pub fn new(behavior: CaptionBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CaptionSource for FakeCaptions {
    async fn fetch(
        &self,
        _video: &VideoReference,
        scratch_dir: &Path,
    ) -> Result<Vec<String>, CaptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(scratch_dir.exists());
        match &self.behavior {
            CaptionBehavior::Lines(lines) => Ok(lines.clone()),
            CaptionBehavior::NotFound => Err(CaptionError::NotFound),
            CaptionBehavior::ProviderError => {
                Err(CaptionError::Provider("HTTP Error 429: Too Many Requests".into()))
            }
        }
    }
}

/// Media fake that writes a dummy audio file into the run directory.
pub struct FakeMedia {
    pub fail: bool,
    pub calls: AtomicUsize,
    pub run_dirs: Mutex<Vec<std::path::PathBuf>>,
}

impl FakeMedia {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            calls: AtomicUsize::new(0),
            run_dirs: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MediaSource for FakeMedia {
    async fn acquire(&self, url: &str, run_dir: &Path) -> vidnotes_core::Result<VideoMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.run_dirs.lock().unwrap().push(run_dir.to_path_buf());
        if self.fail {
            return Err(VidnotesError::DownloadFailed {
                url: url.to_string(),
                reason: "Video unavailable".to_string(),
            });
        }
        let audio_path = run_dir.join("abc123.mp3");
        std::fs::write(&audio_path, b"ID3")?;
        Ok(VideoMetadata {
            title: "Learning Rust".to_string(),
            channel: "Rustacean Station".to_string(),
            thumbnail_url: Some("https://i.ytimg.com/vi/abc123/hq.jpg".to_string()),
            description: "A talk".to_string(),
            audio_path: Some(audio_path),
        })
    }
}

pub struct FakeRecognizer {
    pub segments: Vec<String>,
    pub calls: AtomicUsize,
}

impl FakeRecognizer {
    pub fn new(segments: Vec<String>) -> Self {
        Self {
            segments,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Recognizer for FakeRecognizer {
    async fn transcribe(&self, audio_path: &Path) -> vidnotes_core::Result<Transcript> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(audio_path.exists(), "audio must be downloaded first");
        Ok(Transcript::new(
            TranscriptOrigin::Whisper,
            self.segments.clone(),
        ))
    }
}

pub fn has_timestamp(text: &str) -> bool {
    regex::Regex::new(r"\d:\d").unwrap().is_match(text)
}
