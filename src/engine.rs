//! Document-level orchestration: the line scan, section lifecycle, and
//! run statistics.

use std::sync::Arc;

use crate::config::ChunkingConfig;
use crate::headers::{HeaderTracker, LineOutcome};
use crate::segmenter::SentenceSegmenter;
use crate::splitter::SectionSplitter;
use crate::tokenizer::TokenCounter;
use crate::types::{ChunkingError, ChunkingOutcome, ChunkingStats};

/// Structure-aware Markdown chunking engine.
///
/// Scans a document once, tracking the header stack, and hands each section
/// to the splitter tagged with the header path that was in effect while the
/// section's content was written. Construction goes through
/// [`ChunkingEngine::builder`]; a token counter is required.
///
/// # Examples
///
/// ```
/// use chunksmith::{ChunkingConfig, ChunkingEngine, WordCounter};
///
/// let engine = ChunkingEngine::builder()
///     .config(ChunkingConfig::new().chunk_token_num(128))
///     .counter(WordCounter)
///     .build()?;
///
/// let outcome = engine.chunk("# Title\n\nBody text.\n");
/// assert_eq!(outcome.chunks[0].header_path, "/Title/");
/// # Ok::<(), chunksmith::ChunkingError>(())
/// ```
pub struct ChunkingEngine {
    config: ChunkingConfig,
    counter: Arc<dyn TokenCounter>,
    segmenter: SentenceSegmenter,
}

impl ChunkingEngine {
    /// Start building an engine.
    pub fn builder() -> ChunkingEngineBuilder {
        ChunkingEngineBuilder::default()
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk one Markdown document.
    ///
    /// Pure and synchronous; all intermediate state lives in the call, so a
    /// single engine can serve many threads at once. Empty and
    /// whitespace-only documents produce an empty outcome.
    ///
    /// Each header line flushes the section accumulated so far under the
    /// path captured when that section opened, then starts the next section
    /// with the rendered header line. Content above the first header
    /// belongs to the root path `/`.
    pub fn chunk(&self, content: &str) -> ChunkingOutcome {
        let mut chunks = Vec::new();
        let mut sections = 0usize;

        if !content.is_empty() {
            let splitter = SectionSplitter::new(
                self.config.chunk_token_num,
                self.config.overlapped_percent,
                self.counter.as_ref(),
                &self.segmenter,
            );
            let mut tracker = HeaderTracker::new();
            let mut section = String::new();
            // Captured before the first mutation, and again after each one.
            let mut section_path = tracker.path();

            for line in content.split('\n') {
                match tracker.observe(line) {
                    LineOutcome::Content => {
                        section.push_str(line);
                        section.push('\n');
                    }
                    LineOutcome::Header { rendered } => {
                        let emitted = chunks.len();
                        splitter.split_into(&section, &section_path, &mut chunks);
                        if chunks.len() > emitted {
                            sections += 1;
                        }
                        section.clear();
                        section.push_str(&rendered);
                        section_path = tracker.path();
                    }
                }
            }

            let emitted = chunks.len();
            splitter.split_into(&section, &section_path, &mut chunks);
            if chunks.len() > emitted {
                sections += 1;
            }
        }

        let stats = ChunkingStats::from_chunks(sections, &chunks);
        tracing::debug!(
            chunks = stats.total_chunks,
            sections = stats.total_sections,
            oversized = stats.oversized_chunks,
            counter = self.counter.name(),
            "chunked document"
        );
        ChunkingOutcome { chunks, stats }
    }
}

impl std::fmt::Debug for ChunkingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkingEngine")
            .field("config", &self.config)
            .field("counter", &self.counter.name())
            .field("segmenter", &self.segmenter)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ChunkingEngine`].
#[derive(Default)]
pub struct ChunkingEngineBuilder {
    config: ChunkingConfig,
    counter: Option<Arc<dyn TokenCounter>>,
    segmenter: Option<SentenceSegmenter>,
}

impl ChunkingEngineBuilder {
    /// Set the chunking configuration. Defaults apply otherwise.
    #[must_use]
    pub fn config(mut self, config: ChunkingConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the token counter. Required.
    #[must_use]
    pub fn counter(mut self, counter: impl TokenCounter + 'static) -> Self {
        self.counter = Some(Arc::new(counter));
        self
    }

    /// Set the token counter from an existing handle, for sharing one
    /// counter across engines.
    #[must_use]
    pub fn counter_arc(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Override the sentence segmenter. Defaults to the best backend
    /// compiled in.
    #[must_use]
    pub fn segmenter(mut self, segmenter: SentenceSegmenter) -> Self {
        self.segmenter = Some(segmenter);
        self
    }

    /// Build the engine, rejecting configurations that could never emit a
    /// chunk.
    pub fn build(self) -> Result<ChunkingEngine, ChunkingError> {
        let counter = self.counter.ok_or(ChunkingError::MissingCounter)?;
        self.config.validate()?;
        Ok(ChunkingEngine {
            config: self.config,
            counter,
            segmenter: self.segmenter.unwrap_or_default(),
        })
    }
}
