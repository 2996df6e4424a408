//! Greedy word wrapping measured in characters.
//!
//! Whitespace runs collapse to a single space. Lines never start or end with
//! whitespace.

/// Wrap `text` so every line fits in `width` characters without breaking
/// words. A word longer than `width` is emitted on a line of its own.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    wrap(text, width, false)
}

/// Like [`wrap_words`], but words longer than `width` are split across lines.
pub fn wrap_breaking(text: &str, width: usize) -> Vec<String> {
    wrap(text, width, true)
}

fn wrap(text: &str, width: usize, break_long_words: bool) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if word_len <= width || !break_long_words {
            current.push_str(word);
            current_len = word_len;
            continue;
        }

        let chars: Vec<char> = word.chars().collect();
        let mut pieces = chars.chunks(width).peekable();
        while let Some(piece) = pieces.next() {
            let piece: String = piece.iter().collect();
            if pieces.peek().is_some() {
                lines.push(piece);
            } else {
                current_len = piece.chars().count();
                current = piece;
            }
        }
    }

    if current_len > 0 {
        lines.push(current);
    }

    lines
}
