//! Recursive separator-priority text splitter.
//!
//! Splits at the highest-priority separator that produces pieces within
//! `chunk_size`, re-splits oversized pieces with the next separator down,
//! then greedily merges small adjacent pieces back up to `chunk_size`,
//! carrying up to `chunk_overlap` trailing characters of one fragment into
//! the start of the next. All lengths are in characters, not bytes, so
//! accented Spanish text counts the way the configuration reads.

use tramita_core::types::Fragment;

/// Default separator priority: paragraph break, line break, space, and
/// finally the empty string, which means "split at an arbitrary character".
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl TextSplitter {
    /// Splitter with the default separator priority.
    ///
    /// `chunk_overlap` must be smaller than `chunk_size`; the configuration
    /// loader enforces this before a splitter is ever built.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self::with_separators(
            chunk_size,
            chunk_overlap,
            DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        )
    }

    /// Splitter with a custom separator priority list.
    ///
    /// If the list does not end with `""`, an unsplittable piece longer
    /// than `chunk_size` is emitted as-is rather than corrupted.
    pub fn with_separators(
        chunk_size: usize,
        chunk_overlap: usize,
        separators: Vec<String>,
    ) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            separators,
        }
    }

    /// Split `text` into chunks of at most `chunk_size` characters
    /// (oversized unsplittable pieces excepted). Empty input yields no
    /// chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return vec![];
        }
        self.split_recursive(text, &self.separators)
    }

    /// Split `text` and tag each chunk with its source and position.
    pub fn fragment(&self, text: &str, source: &str) -> Vec<Fragment> {
        self.split(text)
            .into_iter()
            .enumerate()
            .map(|(chunk_id, chunk)| Fragment::new(chunk, source, chunk_id))
            .collect()
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        // Highest-priority separator that actually occurs in this text;
        // the empty string always matches as the last resort.
        let (position, separator) = separators
            .iter()
            .enumerate()
            .find(|(_, sep)| sep.is_empty() || text.contains(sep.as_str()))
            .map(|(i, sep)| (i, sep.clone()))
            .unwrap_or_else(|| (separators.len().saturating_sub(1), String::new()));
        let remaining = &separators[(position + 1).min(separators.len())..];

        let pieces = split_by(text, &separator);

        let mut chunks = Vec::new();
        let mut small: Vec<String> = Vec::new();
        for piece in pieces {
            if char_len(&piece) < self.chunk_size {
                small.push(piece);
                continue;
            }
            if !small.is_empty() {
                chunks.extend(self.merge(&small, &separator));
                small.clear();
            }
            if remaining.is_empty() {
                // No finer separator left: emit oversized rather than
                // corrupt the content.
                chunks.push(piece);
            } else {
                chunks.extend(self.split_recursive(&piece, remaining));
            }
        }
        if !small.is_empty() {
            chunks.extend(self.merge(&small, &separator));
        }
        chunks
    }

    /// Greedily pack `pieces` into chunks of at most `chunk_size`
    /// characters, joined by `separator`. When a chunk closes, trailing
    /// pieces totalling at most `chunk_overlap` characters stay in the
    /// window and open the next chunk.
    fn merge(&self, pieces: &[String], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut window: Vec<&str> = Vec::new();
        let mut total = 0usize;

        for piece in pieces {
            let piece_len = char_len(piece);
            let join_cost = if window.is_empty() { 0 } else { sep_len };
            if total + piece_len + join_cost > self.chunk_size && !window.is_empty() {
                if let Some(chunk) = join_pieces(&window, separator) {
                    chunks.push(chunk);
                }
                // Shrink the window until the retained tail fits the
                // overlap budget and leaves room for the incoming piece.
                while total > self.chunk_overlap
                    || (!window.is_empty()
                        && total + piece_len + sep_len > self.chunk_size)
                {
                    let dropped = window.remove(0);
                    total -= char_len(dropped) + if window.is_empty() { 0 } else { sep_len };
                    if window.is_empty() {
                        break;
                    }
                }
            }
            total += piece_len + if window.is_empty() { 0 } else { sep_len };
            window.push(piece);
        }
        if let Some(chunk) = join_pieces(&window, separator) {
            chunks.push(chunk);
        }
        chunks
    }
}

/// Split `text` by `separator`, dropping empty pieces. The empty separator
/// splits into single characters.
fn split_by(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        text.chars().map(String::from).collect()
    } else {
        text.split(separator)
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string())
            .collect()
    }
}

/// Join pieces with the separator and trim; `None` when nothing but
/// whitespace remains.
fn join_pieces(pieces: &[&str], separator: &str) -> Option<String> {
    let joined = pieces.join(separator);
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
