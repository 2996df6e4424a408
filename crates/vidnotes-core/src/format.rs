use std::sync::LazyLock;

use regex::Regex;

use crate::types::VideoReference;

static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\[(]\s*\d{1,2}(?::\d{2}){1,2}(?:\.\d+)?(?:\s*[-–]\s*\d{1,2}(?::\d{2}){1,2}(?:\.\d+)?)?\s*[\])][ \t]*",
    )
    .expect("timestamp pattern is valid")
});

/// Remove bracketed timestamps such as `[mm:ss]`, `(h:mm:ss)` or
/// `[mm:ss–mm:ss]` from generated text. Bare `d:dd` tokens are left alone:
/// they are as likely to be clock times or verse references.
pub fn strip_timestamps(text: &str) -> String {
    let stripped = TIMESTAMP.replace_all(text, "");
    stripped
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

const MAX_STEM_CHARS: usize = 80;

/// File-system safe stem derived from the video title, falling back to the
/// video ID when nothing usable is left.
pub fn file_stem(title: &str, video: &VideoReference) -> String {
    let mut stem = String::new();
    for c in title.chars() {
        let c = if c.is_alphanumeric() || c == '-' {
            c
        } else if c.is_whitespace() || c == '_' {
            '_'
        } else {
            continue;
        };
        if c == '_' && (stem.is_empty() || stem.ends_with('_')) {
            continue;
        }
        stem.push(c);
        if stem.chars().count() >= MAX_STEM_CHARS {
            break;
        }
    }

    let stem = stem.trim_end_matches('_');
    if stem.is_empty() {
        video.to_string()
    } else {
        stem.to_string()
    }
}

pub fn summary_file_name(title: &str, video: &VideoReference) -> String {
    format!("{}_summary.pdf", file_stem(title, video))
}

pub fn thumbnail_file_stem(title: &str, video: &VideoReference) -> String {
    format!("{}_thumbnail", file_stem(title, video))
}
