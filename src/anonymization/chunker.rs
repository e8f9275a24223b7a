//! Splitting long text into predictor-sized chunks
//!
//! Chunks overlap by roughly `overlap_chars` so an entity cut by one window
//! boundary is still seen whole by the neighbouring chunk. Cuts prefer a
//! sentence break, then any whitespace, and fall back to a hard cut.

use crate::anonymization::config::ChunkingConfig;

/// A slice of the input with its byte offset in the original text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub text: &'a str,
    pub offset: usize,
}

/// Boundary-aware text splitter
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split `text` into ordered, overlapping chunks covering all of it
    ///
    /// Limits are counted in characters; offsets are bytes.
    pub fn split<'a>(&self, text: &'a str) -> Vec<Chunk<'a>> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        let max_chars = self.config.max_chars.max(1);

        if total <= max_chars {
            return vec![Chunk { text, offset: 0 }];
        }

        // byte_at[k] is the byte offset of char k; byte_at[total] == text.len()
        let byte_at: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();

        let mut chunks = Vec::new();
        let mut cursor = 0;

        while cursor < total {
            let window_end = (cursor + max_chars).min(total);
            let cut = if window_end == total {
                total
            } else {
                self.find_cut(&chars, cursor, window_end)
            };

            chunks.push(Chunk {
                text: &text[byte_at[cursor]..byte_at[cut]],
                offset: byte_at[cursor],
            });

            if cut >= total {
                break;
            }

            cursor = cut
                .saturating_sub(self.config.overlap_chars)
                .max(cursor + 1);
        }

        tracing::debug!(chars = total, chunks = chunks.len(), "Split text into chunks");
        chunks
    }

    /// Choose where the window `[cursor, window_end)` ends; always `> cursor`
    fn find_cut(&self, chars: &[char], cursor: usize, window_end: usize) -> usize {
        let sentence_floor = window_end
            .saturating_sub(self.config.sentence_search_chars)
            .max(cursor);
        for i in (sentence_floor..window_end).rev() {
            if is_sentence_terminator(chars[i]) && chars[i + 1].is_whitespace() {
                return i + 1;
            }
        }

        let whitespace_floor = window_end
            .saturating_sub(self.config.whitespace_search_chars)
            .max(cursor + 1);
        for i in (whitespace_floor..window_end).rev() {
            if chars[i].is_whitespace() {
                return i;
            }
        }

        window_end
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(ChunkingConfig::default())
    }
}

fn is_sentence_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '\n')
}
