//! Reduction pipeline configuration.

use serde::{Deserialize, Serialize};

use docsift_core::defaults;
use docsift_core::{Error, Result};

/// Configuration for the content-reduction pipeline.
///
/// Constructed by the caller (defaults + builder methods); the pipeline
/// itself never reads the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionConfig {
    /// Estimated-token threshold above which reduction is applied.
    pub threshold_tokens: usize,
    /// Words per chunk window.
    pub chunk_size: usize,
    /// Overlapping words between adjacent windows. Must be smaller than
    /// `chunk_size`.
    pub overlap: usize,
    /// Target word budget for the reduced output.
    pub target_words: usize,
    /// Weight of the term-frequency score component.
    pub tf_weight: f64,
    /// Weight of the graph-centrality score component.
    pub graph_weight: f64,
    /// Weight of the position score component.
    pub position_weight: f64,
    /// Jaccard similarity above which diversity penalties apply.
    pub diversity_threshold: f64,
    /// Floor for the multiplicative diversity penalty.
    pub min_penalty: f64,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            threshold_tokens: defaults::REDUCTION_THRESHOLD_TOKENS,
            chunk_size: defaults::CHUNK_SIZE,
            overlap: defaults::CHUNK_OVERLAP,
            target_words: defaults::TARGET_WORDS,
            tf_weight: defaults::TF_WEIGHT,
            graph_weight: defaults::GRAPH_WEIGHT,
            position_weight: defaults::POSITION_WEIGHT,
            diversity_threshold: defaults::DIVERSITY_THRESHOLD,
            min_penalty: defaults::MIN_PENALTY,
        }
    }
}

impl ReductionConfig {
    /// Set the chunk size in words.
    pub fn with_chunk_size(mut self, words: usize) -> Self {
        self.chunk_size = words;
        self
    }

    /// Set the overlap in words.
    pub fn with_overlap(mut self, words: usize) -> Self {
        self.overlap = words;
        self
    }

    /// Set the target word budget.
    pub fn with_target_words(mut self, words: usize) -> Self {
        self.target_words = words;
        self
    }

    /// Set the three score-component weights.
    pub fn with_weights(mut self, tf: f64, graph: f64, position: f64) -> Self {
        self.tf_weight = tf;
        self.graph_weight = graph;
        self.position_weight = position;
        self
    }

    /// Validate internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be positive".to_string()));
        }
        if self.overlap >= self.chunk_size {
            return Err(Error::Config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        for (name, weight) in [
            ("tf_weight", self.tf_weight),
            ("graph_weight", self.graph_weight),
            ("position_weight", self.position_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(Error::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, weight
                )));
            }
        }
        let weight_sum = self.tf_weight + self.graph_weight + self.position_weight;
        if weight_sum > 1.0 + f64::EPSILON {
            return Err(Error::Config(format!(
                "score weights must sum to at most 1.0, got {}",
                weight_sum
            )));
        }
        if !(0.0..=1.0).contains(&self.diversity_threshold) {
            return Err(Error::Config(format!(
                "diversity_threshold must be within [0, 1], got {}",
                self.diversity_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.min_penalty) {
            return Err(Error::Config(format!(
                "min_penalty must be within [0, 1], got {}",
                self.min_penalty
            )));
        }
        Ok(())
    }
}
