use url::Url;

use crate::{
    error::{Result, VidnotesError},
    types::VideoReference,
};

fn is_youtube_host(host: &str) -> bool {
    let h = host.to_ascii_lowercase();
    h == "youtube.com" || h == "youtu.be" || h.ends_with(".youtube.com")
}

/// Extract the video ID from a YouTube URL.
///
/// Accepts `youtu.be/<id>`, `youtube.com/watch?v=<id>` and the
/// `/shorts/`, `/embed/` and `/live/` path forms.
pub fn extract_video_id(input: &str) -> Result<VideoReference> {
    let invalid = || VidnotesError::InvalidUrl {
        url: input.to_string(),
    };

    let url = Url::parse(input.trim()).map_err(|_| invalid())?;
    let host = url.host_str().ok_or_else(invalid)?;
    if !is_youtube_host(host) {
        return Err(invalid());
    }

    let id = if host.eq_ignore_ascii_case("youtu.be") {
        url.path_segments().and_then(|mut s| s.next()).map(str::to_string)
    } else if url.path().starts_with("/watch") {
        url.query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())
    } else {
        let mut segs = url.path_segments().into_iter().flatten();
        match (segs.next(), segs.next()) {
            (Some("shorts" | "embed" | "live"), Some(id)) => Some(id.to_string()),
            _ => None,
        }
    };

    id.and_then(VideoReference::new).ok_or_else(invalid)
}
