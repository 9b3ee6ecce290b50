//! Section-level splitting: the fits check, paragraph batching, and the
//! word-aligned overlap carried between consecutive chunks.
//!
//! A section is the rendered header line plus everything up to the next
//! header. Sections that fit the budget become one chunk verbatim. Larger
//! sections are batched paragraph by paragraph; a paragraph that exceeds
//! the budget on its own is handed to the sentence and word cascade.
//! Overlap re-seeds each new buffer with the trailing words of the chunk
//! just flushed, never splitting inside a word.

use crate::cascade;
use crate::segmenter::SentenceSegmenter;
use crate::tokenizer::TokenCounter;
use crate::types::Chunk;

/// Paragraph separator within a section; its token cost is charged whenever
/// two paragraphs are joined in a buffer.
const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Splits one section into chunks that all share its header path.
pub struct SectionSplitter<'a> {
    budget: usize,
    overlap_percent: u8,
    counter: &'a dyn TokenCounter,
    segmenter: &'a SentenceSegmenter,
}

impl<'a> SectionSplitter<'a> {
    pub fn new(
        budget: usize,
        overlap_percent: u8,
        counter: &'a dyn TokenCounter,
        segmenter: &'a SentenceSegmenter,
    ) -> Self {
        Self {
            budget,
            overlap_percent: overlap_percent.min(100),
            counter,
            segmenter,
        }
    }

    /// Split `section` into chunks tagged with `header_path`.
    ///
    /// Whitespace-only sections produce nothing. Every emitted chunk is
    /// trimmed and re-measured; only pieces reduced to a single word that
    /// still exceeds the budget carry the `oversized` flag.
    pub fn split(&self, section: &str, header_path: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        self.split_into(section, header_path, &mut chunks);
        chunks
    }

    /// Run one oversized paragraph through the sentence and word cascade.
    ///
    /// `split` calls this automatically; it is exposed for callers that
    /// batch paragraphs themselves.
    pub fn split_paragraph(&self, paragraph: &str) -> Vec<String> {
        cascade::split_paragraph(paragraph, self.budget, self.counter, self.segmenter)
    }

    pub(crate) fn split_into(&self, section: &str, header_path: &str, out: &mut Vec<Chunk>) {
        if section.trim().is_empty() {
            return;
        }

        // Common case first: the whole section fits in one chunk.
        if self.counter.count(section) <= self.budget {
            self.emit(section, header_path, out);
            return;
        }

        let separator_tokens = self.counter.count(PARAGRAPH_SEPARATOR);
        let mut buffer = String::new();
        let mut buffer_tokens = 0usize;

        for paragraph in section.split(PARAGRAPH_SEPARATOR) {
            let paragraph_tokens = self.counter.count(paragraph);

            // An oversized paragraph cascades on its own. The pending
            // buffer flushes first; the paragraph boundary is already a
            // clean break, so no overlap seed is carried into the cascade.
            if paragraph_tokens > self.budget {
                if !buffer.is_empty() {
                    self.emit(&buffer, header_path, out);
                    buffer.clear();
                    buffer_tokens = 0;
                }
                for piece in self.split_paragraph(paragraph) {
                    let trimmed = piece.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let token_count = self.counter.count(trimmed);
                    out.push(Chunk {
                        text: trimmed.to_string(),
                        header_path: header_path.to_string(),
                        token_count,
                        oversized: token_count > self.budget,
                    });
                }
                continue;
            }

            let separator = if buffer.is_empty() { 0 } else { separator_tokens };
            if buffer_tokens + paragraph_tokens + separator > self.budget && !buffer.is_empty() {
                self.emit(&buffer, header_path, out);
                let (next_buffer, next_tokens) = self.reseed(
                    &buffer,
                    buffer_tokens,
                    paragraph,
                    paragraph_tokens,
                    separator_tokens,
                );
                buffer = next_buffer;
                buffer_tokens = next_tokens;
            } else if buffer.is_empty() {
                buffer.push_str(paragraph);
                buffer_tokens = paragraph_tokens;
            } else {
                buffer.push_str(PARAGRAPH_SEPARATOR);
                buffer.push_str(paragraph);
                buffer_tokens += paragraph_tokens + separator_tokens;
            }
        }

        if !buffer.is_empty() {
            self.emit(&buffer, header_path, out);
        }
    }

    /// Buffer contents for the chunk after a flush: the overlap suffix of
    /// the flushed text, then the separator, then the incoming paragraph.
    fn reseed(
        &self,
        flushed: &str,
        flushed_tokens: usize,
        paragraph: &str,
        paragraph_tokens: usize,
        separator_tokens: usize,
    ) -> (String, usize) {
        if self.overlap_percent > 0 {
            let requested = flushed_tokens * usize::from(self.overlap_percent) / 100;
            // The reseeded buffer must itself start within budget.
            let headroom = self
                .budget
                .saturating_sub(paragraph_tokens + separator_tokens);
            let seed = overlap_suffix(flushed, requested.min(headroom), self.counter);
            if !seed.is_empty() {
                let seed_tokens = self.counter.count(seed);
                tracing::trace!(
                    seed_tokens,
                    requested,
                    "carrying overlap into next chunk"
                );
                return (
                    format!("{seed}{PARAGRAPH_SEPARATOR}{paragraph}"),
                    seed_tokens + separator_tokens + paragraph_tokens,
                );
            }
        }
        (paragraph.to_string(), paragraph_tokens)
    }

    fn emit(&self, text: &str, header_path: &str, out: &mut Vec<Chunk>) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        out.push(Chunk {
            text: trimmed.to_string(),
            header_path: header_path.to_string(),
            token_count: self.counter.count(trimmed),
            oversized: false,
        });
    }
}

/// Longest word-aligned suffix of `text` whose token count stays within
/// `budget`.
///
/// Walks backward from the end, accepting one word at a time together with
/// the whitespace that follows it, and stops before the word that would
/// push the running count past the budget. The result is a true suffix
/// slice, may undershoot the budget, and is empty when even the final word
/// alone exceeds it.
fn overlap_suffix<'t>(text: &'t str, budget: usize, counter: &dyn TokenCounter) -> &'t str {
    if budget == 0 {
        return "";
    }

    let mut word_starts = Vec::new();
    let mut previous_was_space = true;
    for (index, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        if previous_was_space && !is_space {
            word_starts.push(index);
        }
        previous_was_space = is_space;
    }

    let mut running = 0usize;
    let mut suffix_start = text.len();
    for &start in word_starts.iter().rev() {
        let word = &text[start..suffix_start];
        let word_tokens = counter.count(word);
        if running + word_tokens > budget {
            break;
        }
        running += word_tokens;
        suffix_start = start;
    }

    &text[suffix_start..]
}
