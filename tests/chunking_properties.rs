#[macro_use]
extern crate proptest;

use proptest::prelude::{Strategy, prop};

use chunksmith::{
    ChunkingConfig, ChunkingEngine, HeaderTracker, LineOutcome, SentenceSegmenter, TokenCounter,
    WordCounter,
};

// Generators shared by the chunking property tests

fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,10}").unwrap()
}

fn paragraph_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 1..40).prop_map(|words| words.join(" "))
}

/// Header lines at levels 1..=5 with short alphabetic titles.
fn header_strategy() -> impl Strategy<Value = String> {
    let title = prop::string::string_regex("[A-Za-z][a-z ]{0,18}").unwrap();
    (1usize..=5, title)
        .prop_map(|(level, title)| format!("{} {}", "#".repeat(level), title.trim()))
}

/// Fenced blocks whose interior may contain hash lines. The interior
/// alphabet excludes backticks, so a fence never closes early.
fn fenced_block_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::string::string_regex("[a-z# ]{0,20}").unwrap(), 0..4).prop_map(
        |lines| {
            let mut block = String::from("```\n");
            for line in &lines {
                block.push_str(line);
                block.push('\n');
            }
            block.push_str("```");
            block
        },
    )
}

fn document_strategy() -> impl Strategy<Value = String> {
    let block = prop_oneof![
        3 => paragraph_strategy(),
        1 => header_strategy(),
        1 => fenced_block_strategy(),
    ];
    prop::collection::vec(block, 0..12).prop_map(|blocks| blocks.join("\n\n"))
}

fn build_engine(budget: usize, overlap: u8) -> ChunkingEngine {
    ChunkingEngine::builder()
        .config(
            ChunkingConfig::new()
                .chunk_token_num(budget)
                .overlapped_percent(overlap),
        )
        .counter(WordCounter)
        .segmenter(SentenceSegmenter::terminal_punctuation())
        .build()
        .expect("engine construction")
}

/// Section paths a scan of `doc` passes through, in order, starting at
/// the root.
fn reference_section_paths(doc: &str) -> Vec<String> {
    let mut tracker = HeaderTracker::new();
    let mut paths = vec![tracker.path()];
    for line in doc.split('\n') {
        if let LineOutcome::Header { .. } = tracker.observe(line) {
            paths.push(tracker.path());
        }
    }
    paths
}

proptest! {
    /// Chunks are trimmed, non-empty, honestly counted, and rooted at `/`.
    #[test]
    fn prop_chunks_trimmed_counted_and_rooted(
        doc in document_strategy(),
        budget in 1usize..64,
        overlap in 0u8..=100,
    ) {
        let engine = build_engine(budget, overlap);
        for chunk in engine.chunk(&doc).chunks {
            prop_assert!(!chunk.text.is_empty());
            prop_assert!(chunk.text == chunk.text.trim());
            prop_assert_eq!(chunk.token_count, WordCounter.count(&chunk.text));
            prop_assert!(chunk.header_path.starts_with('/'));
            prop_assert!(chunk.header_path.ends_with('/'));
        }
    }
}

proptest! {
    /// No chunk exceeds the budget unless it is a flagged single word.
    #[test]
    fn prop_budget_ceiling_holds(
        doc in document_strategy(),
        budget in 1usize..64,
        overlap in 0u8..=100,
    ) {
        let engine = build_engine(budget, overlap);
        for chunk in engine.chunk(&doc).chunks {
            if chunk.oversized {
                prop_assert!(chunk.token_count > budget);
            } else {
                prop_assert!(
                    chunk.token_count <= budget,
                    "{} tokens over budget {}: {:?}",
                    chunk.token_count,
                    budget,
                    chunk.text
                );
            }
        }
    }
}

proptest! {
    /// Without overlap, emitted words partition the document exactly.
    #[test]
    fn prop_zero_overlap_preserves_words(
        doc in document_strategy(),
        budget in 1usize..64,
    ) {
        let engine = build_engine(budget, 0);
        let emitted: Vec<String> = engine
            .chunk(&doc)
            .chunks
            .iter()
            .flat_map(|chunk| {
                chunk
                    .text
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        let original: Vec<String> = doc.split_whitespace().map(str::to_string).collect();
        prop_assert_eq!(emitted, original);
    }
}

proptest! {
    /// Chunk paths follow the document's section sequence in order.
    #[test]
    fn prop_paths_follow_section_order(
        doc in document_strategy(),
        budget in 1usize..64,
        overlap in 0u8..=50,
    ) {
        let section_paths = reference_section_paths(&doc);
        let engine = build_engine(budget, overlap);
        let mut cursor = 0usize;
        for chunk in engine.chunk(&doc).chunks {
            while cursor < section_paths.len() && section_paths[cursor] != chunk.header_path {
                cursor += 1;
            }
            prop_assert!(
                cursor < section_paths.len(),
                "path {:?} is not on the section sequence",
                chunk.header_path
            );
        }
    }
}

proptest! {
    /// Hash lines inside a fence never contribute to any header path.
    #[test]
    fn prop_fenced_hashes_stay_content(title in word_strategy(), hidden in word_strategy()) {
        let doc = format!("# {title}\n\n```\n# {hidden}\ntext\n```\n");
        let engine = build_engine(512, 10);
        let outcome = engine.chunk(&doc);
        let expected = format!("/{title}/");
        let hidden_line = format!("# {hidden}");
        prop_assert!(!outcome.chunks.is_empty());
        for chunk in &outcome.chunks {
            prop_assert_eq!(&chunk.header_path, &expected);
        }
        prop_assert!(
            outcome
                .chunks
                .iter()
                .any(|chunk| chunk.text.contains(&hidden_line))
        );
    }
}

proptest! {
    /// Consecutive chunks share at most the configured overlap, measured on
    /// documents whose words are globally unique.
    #[test]
    fn prop_overlap_is_bounded(
        paragraph_count in 2usize..8,
        words_per_paragraph in 4usize..12,
        overlap in 0u8..=100,
    ) {
        let paragraphs: Vec<String> = (0..paragraph_count)
            .map(|p| {
                (0..words_per_paragraph)
                    .map(|w| format!("p{p}w{w}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        let doc = paragraphs.join("\n\n");
        let budget = words_per_paragraph + 2;
        let engine = build_engine(budget, overlap);
        let chunks = engine.chunk(&doc).chunks;

        for pair in chunks.windows(2) {
            let tail: Vec<&str> = pair[0].text.split_whitespace().collect();
            let head: Vec<&str> = pair[1].text.split_whitespace().collect();
            let limit = (pair[0].token_count * usize::from(overlap)).div_ceil(100);

            let mut shared = 0usize;
            let max = tail.len().min(head.len());
            for k in 1..=max {
                if tail[tail.len() - k..] == head[..k] {
                    shared = k;
                }
            }
            prop_assert!(
                shared <= limit,
                "chunks share {} words, limit {}",
                shared,
                limit
            );
        }
    }
}

proptest! {
    /// Oversized chunks are always single space-free words over budget.
    #[test]
    fn prop_oversized_chunks_are_lone_words(
        long_words in prop::collection::vec(prop::string::string_regex("[a-z]{12,40}").unwrap(), 1..6),
        budget in 4usize..10,
    ) {
        struct CharCounter;
        impl TokenCounter for CharCounter {
            fn count(&self, text: &str) -> usize {
                text.chars().count()
            }
        }

        let doc = long_words.join(" ");
        let engine = ChunkingEngine::builder()
            .config(
                ChunkingConfig::new()
                    .chunk_token_num(budget)
                    .overlapped_percent(10),
            )
            .counter(CharCounter)
            .segmenter(SentenceSegmenter::terminal_punctuation())
            .build()
            .expect("engine construction");

        for chunk in engine.chunk(&doc).chunks {
            if chunk.oversized {
                prop_assert!(chunk.token_count > budget);
                prop_assert!(!chunk.text.contains(' '));
            } else {
                prop_assert!(chunk.token_count <= budget);
            }
        }
    }
}
