use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::{error::Result, types::VideoReference};

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("vidnotes")
}

pub fn get_model_dir(cache_dir: &Path) -> PathBuf {
    cache_dir.join("models")
}

/// Local secret store: a flat JSON object keyed by environment variable name.
pub fn get_secrets_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vidnotes")
        .join("secrets.json")
}

/// Create the scratch directory for one pipeline run. Removed on drop.
pub fn create_run_dir(video: &VideoReference) -> Result<TempDir> {
    let dir = tempfile::Builder::new()
        .prefix(&format!("vidnotes-{}-", video))
        .tempdir()?;
    Ok(dir)
}

/// Path the audio download lands on inside a run directory
pub fn get_audio_path(run_dir: &Path, video_id: &str) -> PathBuf {
    run_dir.join(format!("{}.mp3", video_id))
}
