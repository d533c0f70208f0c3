use lectern_common::{LecternError, Result};
use serde::Serialize;

/// Smallest share of `max_chunk_size` a chunk fills before a boundary is accepted
const MIN_FILL_PERCENT: usize = 50;

/// Break points, strongest first: paragraph, line, sentence, word
const BOUNDARY_GROUPS: &[&[&str]] = &[
    &["\n\n"],
    &["\n"],
    &[". ", "! ", "? ", "。", "！", "？"],
    &[" ", "\t"],
];

/// Text chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextChunk {
    /// Position in reassembly order (0-based)
    pub index: usize,

    /// Chunk text
    pub text: String,

    /// Start offset in original text (chars)
    pub start: usize,

    /// End offset in original text (chars, exclusive)
    pub end: usize,
}

impl TextChunk {
    /// Chunk length in characters
    pub fn char_count(&self) -> usize {
        self.end - self.start
    }

    /// Approximate token count
    pub fn estimated_tokens(&self) -> usize {
        estimate_tokens(&self.text)
    }
}

/// Approximate token count (1 token ≈ 4 characters)
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}

/// Split text into chunks of at most `max_chunk_size` characters
///
/// Each chunk after the first starts with the last `overlap` characters of
/// its predecessor.
pub fn chunk_text(text: &str, max_chunk_size: usize, overlap: usize) -> Result<Vec<TextChunk>> {
    if text.is_empty() {
        return Err(LecternError::invalid_input("Cannot chunk empty text"));
    }
    if max_chunk_size == 0 {
        return Err(LecternError::invalid_input("Chunk size must be greater than 0"));
    }
    if overlap >= max_chunk_size {
        return Err(LecternError::invalid_input(format!(
            "Chunk overlap ({}) must be smaller than chunk size ({})",
            overlap, max_chunk_size
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();

    if total <= max_chunk_size {
        // Text is short enough, return as single chunk
        return Ok(vec![TextChunk {
            index: 0,
            text: text.to_string(),
            start: 0,
            end: total,
        }]);
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut prev_end = 0;

    loop {
        let hard_end = (start + max_chunk_size).min(total);

        let end = if hard_end == total {
            total
        } else {
            // Every chunk must reach past the previous one
            let min_end = (prev_end + 1)
                .max(start + max_chunk_size * MIN_FILL_PERCENT / 100)
                .min(hard_end);
            find_break_point(&chars, min_end, hard_end).unwrap_or(hard_end)
        };

        chunks.push(TextChunk {
            index: chunks.len(),
            text: chars[start..end].iter().collect(),
            start,
            end,
        });

        if end == total {
            break;
        }

        prev_end = end;
        start = end - overlap.min(end - start);
    }

    Ok(chunks)
}

/// Find the latest boundary ending in `min_end..=max_end`, strongest group first
fn find_break_point(chars: &[char], min_end: usize, max_end: usize) -> Option<usize> {
    for group in BOUNDARY_GROUPS {
        let mut best = None;

        for separator in group.iter() {
            let separator: Vec<char> = separator.chars().collect();
            let len = separator.len();

            let found = (min_end..=max_end)
                .rev()
                .find(|&pos| pos >= len && chars[pos - len..pos] == separator[..]);

            best = best.max(found);
        }

        if best.is_some() {
            return best;
        }
    }

    None
}

/// Rebuild the original text from chunks, skipping overlapping prefixes
pub fn reassemble(chunks: &[TextChunk]) -> String {
    let mut text = String::new();
    let mut covered: usize = 0;

    for chunk in chunks {
        let skip = covered.saturating_sub(chunk.start);
        text.extend(chunk.text.chars().skip(skip));
        covered = covered.max(chunk.end);
    }

    text
}
