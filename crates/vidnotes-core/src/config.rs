use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    cache::{get_root_cache_dir, get_secrets_path},
    error::{Result, VidnotesError},
    provider::Provider,
    transcribe::WhisperModel,
};

pub const DEFAULT_CHUNK_WIDTH: usize = 2000;
pub const DEFAULT_CAPTION_LANGS: &str = "en.*";

/// Settings for one pipeline run. Built once at startup and passed down by
/// reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: Provider,
    pub api_key: String,
    pub chunk_width: usize,
    pub whisper_model: WhisperModel,
    /// yt-dlp `--sub-langs` pattern for caption tracks.
    pub caption_langs: String,
    pub output_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl Config {
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            chunk_width: DEFAULT_CHUNK_WIDTH,
            whisper_model: WhisperModel::default(),
            caption_langs: DEFAULT_CAPTION_LANGS.to_string(),
            output_dir: PathBuf::from("."),
            cache_dir: get_root_cache_dir(),
        }
    }

    /// Build a config for `provider`, reading the API key from the environment
    /// or the local secret store.
    pub fn from_env(provider: Provider) -> Result<Self> {
        let api_key = resolve_api_key(&provider, &get_secrets_path())?;
        Ok(Self::new(provider, api_key))
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_width == 0 {
            return Err(VidnotesError::InvalidChunkWidth);
        }
        Ok(())
    }
}

/// Look the key up in the provider's environment variable first, then in the
/// JSON secret store at `secrets_path`.
pub fn resolve_api_key(provider: &Provider, secrets_path: &Path) -> Result<String> {
    let env_var = provider.config().env_var;

    if let Some(key) = std::env::var(env_var)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
    {
        return Ok(key);
    }

    read_secret(secrets_path, env_var)?.ok_or_else(|| VidnotesError::MissingApiKey {
        env_var: env_var.to_string(),
        secrets_path: secrets_path.to_path_buf(),
    })
}

fn read_secret(secrets_path: &Path, name: &str) -> Result<Option<String>> {
    if !secrets_path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(secrets_path)?;
    let secrets: HashMap<String, String> = serde_json::from_str(&content)?;
    Ok(secrets
        .get(name)
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty()))
}
