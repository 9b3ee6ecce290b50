//! Budget cascade for paragraphs that exceed the chunk budget on their own.
//!
//! Degradation is strict and ordered: sentences are grouped greedily up to
//! the budget, a sentence that cannot fit alone is split into words, and a
//! single word that still exceeds the budget is passed through as the
//! terminal unsplittable unit.

use crate::segmenter::SentenceSegmenter;
use crate::tokenizer::TokenCounter;

/// Split one oversized paragraph into budget-sized pieces.
///
/// Pieces come back in input order. Every piece fits the budget except a
/// lone word whose own count exceeds it.
pub(crate) fn split_paragraph(
    paragraph: &str,
    budget: usize,
    counter: &dyn TokenCounter,
    segmenter: &SentenceSegmenter,
) -> Vec<String> {
    let sentences = segmenter.segment(paragraph);
    if sentences.is_empty() {
        tracing::warn!("no sentences found in oversized paragraph; emitting it whole");
        return vec![paragraph.to_string()];
    }

    let space_tokens = counter.count(" ");
    let mut pieces = Vec::new();
    let mut group = String::new();
    let mut group_tokens = 0usize;

    for sentence in sentences {
        let sentence_tokens = counter.count(&sentence);

        if sentence_tokens > budget {
            if !group.is_empty() {
                pieces.push(std::mem::take(&mut group));
                group_tokens = 0;
            }
            split_words(&sentence, budget, space_tokens, counter, &mut pieces);
            continue;
        }

        let separator = if group.is_empty() { 0 } else { space_tokens };
        if group_tokens + sentence_tokens + separator > budget && !group.is_empty() {
            pieces.push(std::mem::take(&mut group));
            group.push_str(&sentence);
            group_tokens = sentence_tokens;
        } else {
            if !group.is_empty() {
                group.push(' ');
            }
            group.push_str(&sentence);
            group_tokens += sentence_tokens + separator;
        }
    }

    if !group.is_empty() {
        pieces.push(group);
    }

    if pieces.is_empty() {
        vec![paragraph.to_string()]
    } else {
        pieces
    }
}

/// Word-level degradation for one sentence that cannot fit whole.
fn split_words(
    sentence: &str,
    budget: usize,
    space_tokens: usize,
    counter: &dyn TokenCounter,
    pieces: &mut Vec<String>,
) {
    let mut piece = String::new();
    let mut piece_tokens = 0usize;

    for word in sentence.split(' ') {
        let word_tokens = counter.count(word);
        let separator = if piece.is_empty() { 0 } else { space_tokens };

        if piece_tokens + word_tokens + separator > budget && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            piece.push_str(word);
            piece_tokens = word_tokens;
        } else {
            if !piece.is_empty() {
                piece.push(' ');
            }
            piece.push_str(word);
            piece_tokens += word_tokens + separator;
        }
    }

    if !piece.is_empty() {
        pieces.push(piece);
    }
}
