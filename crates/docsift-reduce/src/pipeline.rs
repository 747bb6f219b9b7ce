//! Top-level reduction pipeline and the reduce/pass-through decision.

use tracing::{debug, info};

use docsift_core::text::{clean_up, count_words, estimate_tokens_from_words};

use crate::chunk::split_into_chunks;
use crate::config::ReductionConfig;
use crate::graph::apply_graph_scores;
use crate::scoring::{apply_final_scores, apply_tf_scores};
use crate::selection::{reassemble, select_diverse};

/// Estimate the token count a language model would see for `content`.
pub fn estimate_tokens(content: &str) -> usize {
    let cleaned = clean_up(content);
    estimate_tokens_from_words(count_words(&cleaned))
}

/// Whether a document of `estimated_tokens` should be reduced before
/// inference.
pub fn should_reduce(estimated_tokens: usize, threshold_tokens: usize) -> bool {
    estimated_tokens > threshold_tokens
}

/// Reduce `content` to roughly `config.target_words` words.
///
/// Runs the full pipeline: cleanup, chunking, TF and graph-centrality
/// scoring, weighted combination, greedy diverse selection, and
/// reconstruction in document order. Documents shorter than one chunk
/// window cannot be reduced and are returned unchanged.
pub fn reduce(content: &str, config: &ReductionConfig) -> String {
    let cleaned = clean_up(content);
    let words: Vec<String> = cleaned.split_whitespace().map(str::to_string).collect();

    let mut chunks = split_into_chunks(&words, config.chunk_size, config.overlap);
    if chunks.is_empty() {
        debug!(
            word_count = words.len(),
            chunk_size = config.chunk_size,
            "Document shorter than one chunk, passing through unchanged"
        );
        return content.to_string();
    }

    apply_tf_scores(&mut chunks);
    apply_graph_scores(&mut chunks);
    apply_final_scores(
        &mut chunks,
        config.tf_weight,
        config.graph_weight,
        config.position_weight,
    );

    let chunk_count = chunks.len();
    let selected = select_diverse(
        chunks,
        config.target_words,
        config.diversity_threshold,
        config.min_penalty,
    );
    let reduced = reassemble(&selected, config.overlap);

    info!(
        word_count = words.len(),
        chunk_count,
        selected_count = selected.len(),
        reduced_word_count = count_words(&reduced),
        target_words = config.target_words,
        "Reduced document content"
    );

    reduced
}
