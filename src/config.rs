//! Engine configuration, including ingestion of loosely-typed parser
//! options as they arrive from upstream pipeline templates.

use serde::{Deserialize, Serialize};

use crate::types::ChunkingError;

/// Default chunk budget in tokens.
pub const DEFAULT_CHUNK_TOKENS: usize = 512;
/// Default overlap carried between consecutive chunks, in percent.
pub const DEFAULT_OVERLAP_PERCENT: u8 = 10;

/// Tuning knobs for [`ChunkingEngine`](crate::engine::ChunkingEngine).
///
/// All setters are chainable and `#[must_use]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum tokens per chunk.
    pub chunk_token_num: usize,
    /// Share of a flushed chunk's trailing tokens re-seeded into the next
    /// chunk of the same section, 0 to 100.
    pub overlapped_percent: u8,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_token_num: DEFAULT_CHUNK_TOKENS,
            overlapped_percent: DEFAULT_OVERLAP_PERCENT,
        }
    }
}

impl ChunkingConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk budget in tokens.
    #[must_use]
    pub fn chunk_token_num(mut self, tokens: usize) -> Self {
        self.chunk_token_num = tokens;
        self
    }

    /// Set the overlap percentage, clamped to 100.
    #[must_use]
    pub fn overlapped_percent(mut self, percent: u8) -> Self {
        self.overlapped_percent = percent.min(100);
        self
    }

    /// Read recognized options out of a JSON parser configuration.
    ///
    /// Upstream templates hand chunkers a free-form options object, so this
    /// never fails: a missing, null, zero, negative, or unparseable
    /// `chunk_token_num` falls back to the default, integer-valued strings
    /// are accepted, and `overlapped_percent` is clamped to 0 to 100. An
    /// explicit `overlapped_percent` of zero is honored and disables
    /// overlap.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let chunk_token_num = match read_integer(value, "chunk_token_num") {
            Some(tokens) if tokens > 0 => tokens as usize,
            _ => DEFAULT_CHUNK_TOKENS,
        };
        let overlapped_percent = read_integer(value, "overlapped_percent")
            .map(|percent| percent.clamp(0, 100) as u8)
            .unwrap_or(DEFAULT_OVERLAP_PERCENT);
        Self {
            chunk_token_num,
            overlapped_percent,
        }
    }

    /// Reject configurations the splitter cannot make progress with.
    pub(crate) fn validate(&self) -> Result<(), ChunkingError> {
        if self.chunk_token_num == 0 {
            return Err(ChunkingError::ZeroBudget);
        }
        Ok(())
    }
}

fn read_integer(value: &serde_json::Value, key: &str) -> Option<i64> {
    let field = value.get(key)?;
    field
        .as_i64()
        .or_else(|| field.as_str().and_then(|raw| raw.trim().parse().ok()))
}
