//! Chunk records, per-run statistics, and the crate error type.

use serde::{Deserialize, Serialize};

/// One budget-bounded unit of document text, ready for embedding.
///
/// The text is trimmed and never empty. `header_path` is the slash-delimited
/// header ancestry that was in effect when the chunk's section opened, for
/// example `/Chapter 1/Section 1.1/`, or `/` for content above the first
/// header. `token_count` is re-measured on the trimmed text by the counter
/// the engine was built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub header_path: String,
    pub token_count: usize,
    /// Set when a single unsplittable word still exceeded the budget after
    /// the full paragraph, sentence, and word cascade.
    #[serde(default)]
    pub oversized: bool,
}

/// Summary numbers for one chunking run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChunkingStats {
    /// Sections that produced at least one chunk.
    pub total_sections: usize,
    pub total_chunks: usize,
    /// Mean `token_count` across all chunks, `0.0` when nothing was emitted.
    pub average_tokens: f64,
    pub oversized_chunks: usize,
}

impl ChunkingStats {
    pub(crate) fn from_chunks(total_sections: usize, chunks: &[Chunk]) -> Self {
        let total_chunks = chunks.len();
        let oversized_chunks = chunks.iter().filter(|chunk| chunk.oversized).count();
        let average_tokens = if total_chunks == 0 {
            0.0
        } else {
            let total: usize = chunks.iter().map(|chunk| chunk.token_count).sum();
            total as f64 / total_chunks as f64
        };
        Self {
            total_sections,
            total_chunks,
            average_tokens,
            oversized_chunks,
        }
    }
}

/// Ordered chunks plus the statistics gathered while producing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkingOutcome {
    pub chunks: Vec<Chunk>,
    pub stats: ChunkingStats,
}

impl ChunkingOutcome {
    /// Consumes the outcome, keeping only the ordered chunk list.
    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Error type for engine and counter construction.
///
/// Chunking itself is infallible once an engine exists; everything that can
/// go wrong is rejected while building.
#[derive(Debug, thiserror::Error)]
pub enum ChunkingError {
    /// The configured chunk budget is zero, so no text could ever fit.
    #[error("chunk_token_num must be at least 1")]
    ZeroBudget,

    /// No token counter was supplied to the engine builder.
    #[error("a token counter is required; set one with `.counter(..)`")]
    MissingCounter,

    /// The requested tokenizer model was rejected by tiktoken.
    #[cfg(feature = "tiktoken-counter")]
    #[error("unsupported tokenizer model '{model}': {reason}")]
    UnknownTokenizerModel { model: String, reason: String },
}
