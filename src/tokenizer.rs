//! Token counting strategies.
//!
//! The engine never assumes one tokenizer; callers inject any
//! [`TokenCounter`] at construction. [`TiktokenCounter`] (feature
//! `tiktoken-counter`, on by default) reproduces the accounting of OpenAI
//! models, [`HeuristicCounter`] estimates from character counts, and
//! [`WordCounter`] counts whitespace-delimited words.

#[cfg(feature = "tiktoken-counter")]
use crate::types::ChunkingError;

/// Maps a text span to a token count.
///
/// Implementations must be deterministic and cheap to call repeatedly:
/// buffers are re-measured after every mutation, including while computing
/// overlap suffixes. Trimming leading or trailing whitespace from a span
/// must not increase its count. Budget guarantees are exact for counters
/// that are additive under concatenation (such as [`WordCounter`]); sub-word
/// estimators hold them within their approximation tolerance.
pub trait TokenCounter: Send + Sync {
    /// Count the tokens in `text`. Empty text counts zero.
    fn count(&self, text: &str) -> usize;

    /// Short label used in diagnostics.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Character-ratio estimator for when an exact tokenizer is unavailable.
///
/// Latin-script text averages roughly four characters per token; CJK text
/// tokenizes denser, at about 1.8 characters per token.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCounter {
    cjk: bool,
}

impl HeuristicCounter {
    /// Estimator tuned for English and other Latin-script text.
    #[must_use]
    pub fn english() -> Self {
        Self { cjk: false }
    }

    /// Estimator tuned for CJK text.
    #[must_use]
    pub fn cjk() -> Self {
        Self { cjk: true }
    }
}

impl TokenCounter for HeuristicCounter {
    fn count(&self, text: &str) -> usize {
        let chars = text.chars().count();
        if self.cjk {
            // chars / 1.8, expressed as chars * 5 / 9.
            ((chars * 5) as f64 / 9.0).round() as usize
        } else {
            chars / 4
        }
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// Counts whitespace-delimited words.
///
/// Exact and allocation-free. Useful when budgets are defined in words
/// rather than subword tokens, and as a fully deterministic counter in
/// tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn name(&self) -> &'static str {
        "words"
    }
}

/// Model used by [`TiktokenCounter::new`].
#[cfg(feature = "tiktoken-counter")]
pub const DEFAULT_TOKENIZER_MODEL: &str = "gpt-3.5-turbo";

/// Exact BPE token counting backed by `tiktoken-rs`.
///
/// The model name is resolved once at construction; an unknown name fails
/// with [`ChunkingError::UnknownTokenizerModel`] instead of degrading to an
/// estimate.
#[cfg(feature = "tiktoken-counter")]
pub struct TiktokenCounter {
    bpe: tiktoken_rs::CoreBPE,
    model: String,
}

#[cfg(feature = "tiktoken-counter")]
impl TiktokenCounter {
    /// Build a counter for [`DEFAULT_TOKENIZER_MODEL`].
    pub fn new() -> Result<Self, ChunkingError> {
        Self::for_model(DEFAULT_TOKENIZER_MODEL)
    }

    /// Build a counter for a specific model name, e.g. `"gpt-4o"`.
    pub fn for_model(model: &str) -> Result<Self, ChunkingError> {
        let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|err| {
            ChunkingError::UnknownTokenizerModel {
                model: model.to_string(),
                reason: err.to_string(),
            }
        })?;
        Ok(Self {
            bpe,
            model: model.to_string(),
        })
    }

    /// Model name the counter was built for.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(feature = "tiktoken-counter")]
impl std::fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "tiktoken-counter")]
impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        self.bpe.encode_ordinary(text).len()
    }

    fn name(&self) -> &'static str {
        "tiktoken"
    }
}
