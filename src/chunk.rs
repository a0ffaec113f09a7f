/// Default chunk size in characters
pub const DEFAULT_MAX_CHARS: usize = 3000;

/// Split `text` into consecutive windows of `max_chars` characters.
///
/// The last chunk holds the remainder. Boundaries ignore words and sentences.
/// Chunks borrow from `text` and concatenate back to it exactly. A
/// `max_chars` of zero is treated as one.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::with_capacity(text.len() / max_chars + 1);
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}
