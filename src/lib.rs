//! Structure-aware Markdown chunking for RAG ingestion.
//!
//! ```text
//! Markdown ──► headers::HeaderTracker ──► sections + header paths
//!                                              │
//! sections ──► splitter::SectionSplitter ──► budget-sized chunks
//!                        │
//!                        ├─► sentence / word cascade
//!                        └─► tokenizer & segmenter strategies
//!
//! chunks ──► types::ChunkingOutcome ──► embedding & storage layers
//! ```
//!
//! The engine makes three guarantees. Every chunk's `header_path` reflects
//! the header stack at the moment its section opened, with fenced code
//! blocks treated as opaque. No chunk exceeds the token budget unless a
//! single unsplittable word does, and such chunks are flagged `oversized`.
//! Consecutive chunks of a section overlap by a configurable share of
//! trailing tokens, always on word boundaries.
//!
//! Token counting is injected rather than assumed: build the engine with
//! any [`TokenCounter`]. Exact BPE counting ships behind the
//! `tiktoken-counter` feature (on by default); [`HeuristicCounter`] and
//! [`WordCounter`] are always available.

pub mod config;
pub mod engine;
pub mod headers;
pub mod segmenter;
pub mod splitter;
pub mod tokenizer;
pub mod types;

mod cascade;

pub use config::{ChunkingConfig, DEFAULT_CHUNK_TOKENS, DEFAULT_OVERLAP_PERCENT};
pub use engine::{ChunkingEngine, ChunkingEngineBuilder};
pub use headers::{HeaderEntry, HeaderTracker, LineOutcome};
pub use segmenter::SentenceSegmenter;
pub use splitter::SectionSplitter;
#[cfg(feature = "tiktoken-counter")]
pub use tokenizer::{DEFAULT_TOKENIZER_MODEL, TiktokenCounter};
pub use tokenizer::{HeuristicCounter, TokenCounter, WordCounter};
pub use types::{Chunk, ChunkingError, ChunkingOutcome, ChunkingStats};
