//! Sentence segmentation with graceful degradation.
//!
//! Oversized paragraphs are split at sentence boundaries first. The precise
//! backend (the `segtok` crate, behind the `segtok-sentences` feature)
//! understands abbreviations and decimal points; without it, a regex
//! fallback splits after sentence-terminal punctuation. The backend is
//! chosen once at construction, and falling back is logged once per process
//! so operators can tell which splitter produced a run.

/// Splits text into sentences using the best backend compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceSegmenter {
    backend: Backend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    #[cfg(feature = "segtok-sentences")]
    Segtok,
    Terminal,
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceSegmenter {
    /// Select the precise backend when compiled in, otherwise the
    /// terminal-punctuation fallback.
    #[must_use]
    pub fn new() -> Self {
        #[cfg(feature = "segtok-sentences")]
        {
            Self {
                backend: Backend::Segtok,
            }
        }
        #[cfg(not(feature = "segtok-sentences"))]
        {
            static FALLBACK_WARNING: std::sync::Once = std::sync::Once::new();
            FALLBACK_WARNING.call_once(|| {
                tracing::warn!(
                    "precise sentence segmentation not compiled in; \
                     splitting on terminal punctuation instead"
                );
            });
            Self {
                backend: Backend::Terminal,
            }
        }
    }

    /// Always split on terminal punctuation, regardless of compiled
    /// features. Deterministic across builds, which makes it the right
    /// choice for tests.
    #[must_use]
    pub fn terminal_punctuation() -> Self {
        Self {
            backend: Backend::Terminal,
        }
    }

    /// Split `text` into sentences.
    ///
    /// Whitespace-only pieces are dropped; text without any detectable
    /// boundary comes back as a single sentence.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let mut sentences: Vec<String> = match self.backend {
            #[cfg(feature = "segtok-sentences")]
            Backend::Segtok => {
                segtok::segmenter::split_single(text, segtok::segmenter::SegmentConfig::default())
            }
            Backend::Terminal => split_terminal(text),
        };
        sentences.retain(|sentence| !sentence.trim().is_empty());
        sentences
    }
}

fn split_terminal(text: &str) -> Vec<String> {
    use regex::Regex;
    use std::sync::LazyLock;

    // Sentence-terminal punctuation followed by whitespace; the boundary
    // sits after the punctuation mark.
    static SENTENCE_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_END_RE.find_iter(text) {
        let end = boundary.start() + 1;
        if end > start {
            sentences.push(text[start..end].to_string());
        }
        start = boundary.end();
    }
    if start < text.len() {
        sentences.push(text[start..].to_string());
    }
    sentences
}
