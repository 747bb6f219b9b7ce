//! Greedy diverse chunk selection and document reconstruction.
//!
//! Selection is maximal-marginal-relevance in spirit: the best-scoring
//! chunk is taken, every remaining chunk similar to it is penalized, and
//! the remainder is re-ranked before the next pick. Near-duplicate
//! high scorers lose rank instead of being removed outright, so they can
//! still be selected once the budget allows.

use std::cmp::Ordering;

use tracing::trace;

use crate::chunk::{jaccard_similarity, Chunk};

fn by_final_score_desc(a: &Chunk, b: &Chunk) -> Ordering {
    b.final_score
        .partial_cmp(&a.final_score)
        .unwrap_or(Ordering::Equal)
}

/// Pick chunks up to `target_words`, penalizing near-duplicates.
///
/// Chunk 0 is always selected first (the document opening carries titles
/// and parties) and counts toward the budget. The result is re-sorted by
/// chunk id, restoring document order.
pub fn select_diverse(
    chunks: Vec<Chunk>,
    target_words: usize,
    diversity_threshold: f64,
    min_penalty: f64,
) -> Vec<Chunk> {
    if chunks.is_empty() {
        return chunks;
    }

    let mut iter = chunks.into_iter();
    let opening = iter.next().expect("non-empty chunk list");
    let mut current_words = opening.word_count;

    let mut selected = vec![opening];
    let mut remaining: Vec<Chunk> = iter.collect();
    remaining.sort_by(by_final_score_desc);

    while !remaining.is_empty() && current_words < target_words {
        let picked = remaining.remove(0);
        current_words += picked.word_count;

        for candidate in remaining.iter_mut() {
            let similarity = jaccard_similarity(&picked.unique_tokens, &candidate.unique_tokens);
            if similarity > diversity_threshold {
                let penalty = (1.0 - 2.0 * similarity).max(min_penalty);
                trace!(
                    picked_id = picked.id,
                    candidate_id = candidate.id,
                    similarity,
                    penalty,
                    "Applying diversity penalty"
                );
                candidate.final_score *= penalty;
            }
        }

        remaining.sort_by(by_final_score_desc);
        selected.push(picked);
    }

    selected.sort_by_key(|chunk| chunk.id);
    selected
}

/// Reassemble selected chunks into reduced text.
///
/// Expects chunks in document order. The first chunk contributes all its
/// words; each later chunk skips its first `overlap` words, which the
/// previous window already contributed. Chunks are separated by a line
/// break.
pub fn reassemble(selected: &[Chunk], overlap: usize) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(selected.len());

    for (i, chunk) in selected.iter().enumerate() {
        if i == 0 {
            parts.push(chunk.raw_text.clone());
        } else {
            let tail = &chunk.words[overlap.min(chunk.words.len())..];
            parts.push(tail.join(" "));
        }
    }

    parts.join("\n")
}
