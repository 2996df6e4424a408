//! Vidnotes Core Library
//!
//! Turns a video URL into study notes: fetches captions (or downloads the
//! audio and transcribes it with Whisper), summarizes the transcript with a
//! generative-language service and renders the report as a PDF.

pub mod audio;
pub mod cache;
pub mod captions;
pub mod config;
pub mod error;
pub mod format;
pub mod pdf;
pub mod pipeline;
pub mod provider;
pub mod summarize;
pub mod thumbnail;
pub mod transcribe;
pub mod types;
pub mod video;
pub mod wrap;

// Re-export commonly used items at crate root
pub use audio::{MediaSource, YtDlpAudio};
pub use cache::{get_root_cache_dir, get_secrets_path};
pub use captions::{CaptionSource, YtDlpCaptions, resolve};
pub use config::Config;
pub use error::{CaptionError, GenerationError, Result, VidnotesError};
pub use format::{file_stem, strip_timestamps, summary_file_name, thumbnail_file_stem};
pub use pdf::export_pdf;
pub use pipeline::{Pipeline, PipelineEvent, PipelineOutput, Services, Stage};
pub use provider::{ChatClient, Generator, Provider, ProviderConfig};
pub use summarize::{CHUNK_PLACEHOLDER, ChunkSummary, ReportGenerator, split_chunks};
pub use thumbnail::save_thumbnail;
pub use transcribe::{Recognizer, WhisperModel, WhisperRecognizer, ensure_model};
pub use types::{Report, Transcript, TranscriptOrigin, VideoMetadata, VideoReference};
pub use video::extract_video_id;
