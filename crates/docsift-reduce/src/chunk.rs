//! Chunk windows over a document's word sequence.
//!
//! A chunk is a fixed-size window of consecutive words, overlapping its
//! neighbors so sentence fragments at window edges appear in full in at
//! least one chunk. Chunks are the unit of scoring and selection; every
//! score field lives on the chunk record and is filled in by later
//! pipeline stages.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("valid token pattern"));

/// One scored window of document words.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Position of this chunk in document order.
    pub id: usize,
    /// Index of the first word in the source word sequence.
    pub start_index: usize,
    /// One past the index of the last word.
    pub end_index: usize,
    /// The window's words, in order.
    pub words: Vec<String>,
    /// Words joined with single spaces.
    pub raw_text: String,
    /// Chunk position scaled to [0, 1) over the chunk count.
    pub normalized_position: f64,
    pub word_count: usize,
    /// Total token occurrences in the window.
    pub token_count: usize,
    pub token_frequencies: HashMap<String, usize>,
    pub unique_tokens: HashSet<String>,
    pub tf_score: f64,
    pub normalized_tf_score: f64,
    pub graph_score: f64,
    pub normalized_graph_score: f64,
    pub final_score: f64,
}

/// Split a word sequence into overlapping chunk windows.
///
/// Step size is `chunk_size - overlap`; chunk `i` spans words
/// `[i * step, i * step + chunk_size)`. Sequences shorter than one full
/// window yield no chunks, which callers treat as "no reduction possible".
pub fn split_into_chunks(words: &[String], chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    if chunk_size == 0 || overlap >= chunk_size || words.len() < chunk_size {
        return Vec::new();
    }

    let step = chunk_size - overlap;
    let total_chunks = (words.len() - overlap) / step;

    let mut chunks = Vec::with_capacity(total_chunks);
    for id in 0..total_chunks {
        let start_index = id * step;
        let end_index = start_index + chunk_size;
        let chunk_words = words[start_index..end_index].to_vec();

        let mut token_frequencies: HashMap<String, usize> = HashMap::new();
        let mut token_count = 0usize;
        for word in &chunk_words {
            for token in NON_ALPHANUMERIC.split(word) {
                if token.is_empty() {
                    continue;
                }
                *token_frequencies.entry(token.to_string()).or_insert(0) += 1;
                token_count += 1;
            }
        }
        let unique_tokens: HashSet<String> = token_frequencies.keys().cloned().collect();

        chunks.push(Chunk {
            id,
            start_index,
            end_index,
            raw_text: chunk_words.join(" "),
            normalized_position: id as f64 / total_chunks as f64,
            word_count: chunk_words.len(),
            words: chunk_words,
            token_count,
            token_frequencies,
            unique_tokens,
            tf_score: 0.0,
            normalized_tf_score: 0.0,
            graph_score: 0.0,
            normalized_graph_score: 0.0,
            final_score: 0.0,
        });
    }

    chunks
}

/// Jaccard similarity of two token sets: `|A ∩ B| / |A ∪ B|`.
///
/// Two empty sets are defined as dissimilar (0.0), not identical.
pub fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;

    intersection as f64 / union as f64
}
