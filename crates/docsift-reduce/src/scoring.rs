//! Term-frequency and position scoring, and the weighted combination.

use std::collections::HashMap;

use crate::chunk::Chunk;

/// Score every chunk by log-dampened term frequency, normalized to sum to 1.
///
/// A token's global frequency is its summed frequency across all chunks.
/// Each chunk's raw score is `Σ ln(1 + global_freq(tok)) * local_freq(tok)`
/// divided by the chunk's token count, so long chunks don't win by length
/// alone. The log dampens very common tokens.
pub fn apply_tf_scores(chunks: &mut [Chunk]) {
    let mut global_freq: HashMap<String, usize> = HashMap::new();
    for chunk in chunks.iter() {
        for (token, freq) in &chunk.token_frequencies {
            *global_freq.entry(token.clone()).or_insert(0) += freq;
        }
    }

    let mut sum = 0.0;
    for chunk in chunks.iter_mut() {
        let mut total = 0.0;
        for (token, local_freq) in &chunk.token_frequencies {
            total += (1.0 + global_freq[token] as f64).ln() * *local_freq as f64;
        }
        chunk.tf_score = if chunk.token_count > 0 {
            total / chunk.token_count as f64
        } else {
            0.0
        };
        sum += chunk.tf_score;
    }

    if sum > 0.0 {
        for chunk in chunks.iter_mut() {
            chunk.normalized_tf_score = chunk.tf_score / sum;
        }
    }
}

/// Position score for a normalized position `p ∈ [0, 1]`.
///
/// A folded cosine with period 1: `0.5 + 0.5 * |cos(2π p)|`, peaking at
/// the document opening and midpoint, where titles, parties, and totals
/// tend to live.
fn position_curve(p: f64) -> f64 {
    0.5 + 0.5 * (p * std::f64::consts::TAU).cos().abs()
}

/// Combine TF, graph, and position components into each chunk's final score.
///
/// Position scores are computed here from `normalized_position` and
/// normalized to sum to 1 across chunks before weighting; they are not
/// stored on the chunk.
pub fn apply_final_scores(chunks: &mut [Chunk], tf_weight: f64, graph_weight: f64, position_weight: f64) {
    let position_scores: Vec<f64> = chunks
        .iter()
        .map(|c| position_curve(c.normalized_position))
        .collect();
    let position_sum: f64 = position_scores.iter().sum();

    for (chunk, position_score) in chunks.iter_mut().zip(&position_scores) {
        let normalized_position_score = if position_sum > 0.0 {
            position_score / position_sum
        } else {
            0.0
        };

        chunk.final_score = tf_weight * chunk.normalized_tf_score
            + graph_weight * chunk.normalized_graph_score
            + position_weight * normalized_position_score;
    }
}
