use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::error::{Result, VidnotesError};

/// Check the bytes decode as a raster image and report their format.
pub fn decode_thumbnail(bytes: &[u8]) -> std::result::Result<ImageFormat, String> {
    let format = image::guess_format(bytes).map_err(|e| e.to_string())?;
    image::load_from_memory_with_format(bytes, format).map_err(|e| e.to_string())?;
    Ok(format)
}

/// Download the thumbnail at `url` and store it as `<dir>/<file_stem>.<ext>`.
pub async fn save_thumbnail(url: &str, dir: &Path, file_stem: &str) -> Result<PathBuf> {
    let failed = |reason: String| VidnotesError::ThumbnailFailed {
        url: url.to_string(),
        reason,
    };

    let response = reqwest::get(url).await?;
    if !response.status().is_success() {
        return Err(failed(format!("HTTP {}", response.status())));
    }
    let bytes = response.bytes().await?;

    let format = decode_thumbnail(&bytes).map_err(failed)?;
    let extension = format.extensions_str().first().copied().unwrap_or("img");

    let path = dir.join(format!("{}.{}", file_stem, extension));
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, &bytes).await?;
    Ok(path)
}
