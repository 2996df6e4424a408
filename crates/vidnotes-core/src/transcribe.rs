use std::{
    fmt,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{fs, process::Command};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::{
    cache::get_model_dir,
    error::{Result, VidnotesError},
    types::{Transcript, TranscriptOrigin},
};

/// Whisper capacity tier. All tiers use 8-bit quantized ggml weights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WhisperModel {
    Tiny,
    #[default]
    Base,
    Small,
    Medium,
}

impl WhisperModel {
    pub fn file_name(&self) -> &'static str {
        match self {
            WhisperModel::Tiny => "ggml-tiny-q8_0.bin",
            WhisperModel::Base => "ggml-base-q8_0.bin",
            WhisperModel::Small => "ggml-small-q8_0.bin",
            WhisperModel::Medium => "ggml-medium-q8_0.bin",
        }
    }

    pub fn download_url(&self) -> String {
        format!(
            "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/{}",
            self.file_name()
        )
    }
}

impl fmt::Display for WhisperModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WhisperModel::Tiny => "tiny",
            WhisperModel::Base => "base",
            WhisperModel::Small => "small",
            WhisperModel::Medium => "medium",
        };
        f.write_str(name)
    }
}

/// Download the model into the cache unless it is already there.
pub async fn ensure_model(cache_dir: &Path, model: WhisperModel) -> Result<PathBuf> {
    let download_url = model.download_url();
    let model_dir = get_model_dir(cache_dir);

    if !model_dir.exists() {
        fs::create_dir_all(&model_dir).await?;
    }

    let model_path = model_dir.join(model.file_name());
    if model_path.exists() {
        return Ok(model_path);
    }

    tracing::info!(model = %model, url = %download_url, "downloading whisper model");
    let partial_path = model_path.with_extension("part");
    let output = Command::new("curl")
        .arg("-fL")
        .arg(&download_url)
        .arg("-o")
        .arg(&partial_path)
        .output()
        .await?;

    if !output.status.success() {
        let _ = fs::remove_file(&partial_path).await;
        return Err(VidnotesError::ModelDownloadFailed {
            url: download_url,
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    fs::rename(&partial_path, &model_path).await?;
    Ok(model_path)
}

/// Resample any audio file to the 16 kHz mono PCM WAV whisper expects.
pub async fn convert_to_wav(audio_path: &Path, wav_path: &Path) -> Result<()> {
    let output = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(audio_path)
        .arg("-vn")
        .arg("-acodec")
        .arg("pcm_s16le")
        .arg("-ar")
        .arg("16000")
        .arg("-ac")
        .arg("1")
        .arg(wav_path)
        .output()
        .await?;

    if !output.status.success() {
        return Err(VidnotesError::AudioExtractionFailed {
            audio_path: audio_path.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(())
}

/// Speech-to-text over a whole audio file.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;
}

/// Local whisper.cpp inference on the CPU. The model is fetched into
/// `cache_dir` on the first transcription, not at construction.
pub struct WhisperRecognizer {
    cache_dir: PathBuf,
    model: WhisperModel,
}

impl WhisperRecognizer {
    pub fn new(cache_dir: PathBuf, model: WhisperModel) -> Self {
        Self { cache_dir, model }
    }
}

#[async_trait]
impl Recognizer for WhisperRecognizer {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        let model_path = ensure_model(&self.cache_dir, self.model).await?;
        let wav_path = audio_path.with_extension("wav");
        convert_to_wav(audio_path, &wav_path).await?;

        let joined =
            tokio::task::spawn_blocking(move || run_whisper(&model_path, &wav_path)).await;

        let segments = match joined {
            Ok(Ok(segments)) => segments,
            Ok(Err(reason)) => {
                return Err(VidnotesError::TranscriptFailed {
                    audio_path: audio_path.to_path_buf(),
                    reason,
                });
            }
            Err(e) => {
                return Err(VidnotesError::TranscriptFailed {
                    audio_path: audio_path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        tracing::info!(segments = segments.len(), "whisper transcription finished");
        Ok(Transcript::new(TranscriptOrigin::Whisper, segments))
    }
}

fn read_samples(wav_path: &Path) -> std::result::Result<Vec<f32>, String> {
    let mut reader = hound::WavReader::open(wav_path).map_err(|e| e.to_string())?;
    reader
        .samples::<i16>()
        .map(|s| s.map(|s| s as f32 / i16::MAX as f32))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())
}

fn run_whisper(model_path: &Path, wav_path: &Path) -> std::result::Result<Vec<String>, String> {
    let samples = read_samples(wav_path)?;

    let model_path_str = model_path
        .to_str()
        .ok_or_else(|| format!("model path is not valid UTF-8: {}", model_path.display()))?;

    let ctx_params = WhisperContextParameters {
        use_gpu: false,
        ..Default::default()
    };
    let ctx = WhisperContext::new_with_params(model_path_str, ctx_params)
        .map_err(|e| format!("failed to load model: {e}"))?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
    params.set_language(Some("auto"));
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_special(false);
    params.set_print_timestamps(false);
    let threads = std::thread::available_parallelism().map_or(4, |n| n.get());
    params.set_n_threads(threads as i32);

    let mut state = ctx
        .create_state()
        .map_err(|e| format!("failed to create state: {e}"))?;
    state
        .full(params, &samples)
        .map_err(|e| format!("failed to run model: {e}"))?;

    let segments = state
        .as_iter()
        .filter_map(|segment| segment.to_str().ok().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .collect();

    Ok(segments)
}
