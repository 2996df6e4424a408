use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VidnotesError {
    #[error("Could not extract a video ID from {url}")]
    InvalidUrl { url: String },

    #[error("Download failed for {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("Audio extraction failed for {audio_path}: {reason}")]
    AudioExtractionFailed { audio_path: PathBuf, reason: String },

    #[error("Transcription failed for {audio_path}: {reason}")]
    TranscriptFailed { audio_path: PathBuf, reason: String },

    #[error("Model download failed from {url}: {reason}")]
    ModelDownloadFailed { url: String, reason: String },

    #[error("Report generation failed: {0}")]
    GenerationFailed(#[from] GenerationError),

    #[error("PDF rendering failed for {path}: {reason}")]
    RenderFailed { path: PathBuf, reason: String },

    #[error("Thumbnail fetch failed for {url}: {reason}")]
    ThumbnailFailed { url: String, reason: String },

    #[error("Chunk width must be greater than zero")]
    InvalidChunkWidth,

    #[error("Missing API key: set {env_var} or add it to {secrets_path}")]
    MissingApiKey {
        env_var: String,
        secrets_path: PathBuf,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

/// Failure of a single request to the generative-report service.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid response structure: {0}")]
    InvalidResponse(String),

    #[error("service returned an empty response")]
    EmptyResponse,
}

/// Why a direct caption fetch produced nothing.
#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("no caption track found")]
    NotFound,

    #[error("caption provider failed: {0}")]
    Provider(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VidnotesError>;
