//! Splits the listings corpus into request-sized chunks without cutting a
//! listing in half whenever a boundary is available.

/// Maximum chunk size in bytes of UTF-8 text.
pub const CHUNK_BUDGET: usize = 100_000;

/// Chunks shorter than this (in characters, after trimming) are never scored.
pub const MIN_CHUNK_CHARS: usize = 100;

/// Preferred cut points, most specific first.
const BOUNDARIES: [&str; 3] = ["\nJob ", "\n---", "\n\n"];

/// Splits `text` into trimmed, non-empty chunks of at most `budget` bytes.
pub fn split_corpus(text: &str, budget: usize) -> Vec<String> {
    if text.len() <= budget {
        let trimmed = text.trim();
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        };
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let end = start + budget;
        if end >= text.len() {
            chunks.push(text[start..].trim().to_string());
            break;
        }

        let end = floor_char_boundary(text, end).max(start + 1);
        let end = ceil_char_boundary(text, end);
        let split_at = find_boundary(&text[start..end])
            .map(|offset| start + offset)
            .unwrap_or(end);

        chunks.push(text[start..split_at].trim().to_string());
        start = split_at;
    }

    chunks.retain(|c| !c.is_empty());
    chunks
}

/// Rightmost boundary strictly after the window start.
fn find_boundary(window: &str) -> Option<usize> {
    BOUNDARIES
        .iter()
        .find_map(|marker| window.rfind(marker).filter(|&pos| pos > 0))
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    while !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// True when a chunk is long enough to be worth a scoring request.
pub fn is_scorable(chunk: &str) -> bool {
    chunk.trim().chars().count() >= MIN_CHUNK_CHARS
}
