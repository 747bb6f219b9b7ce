//! Line protocol spoken with worker processes.
//!
//! Every message is one UTF-8 JSON object per newline-terminated line on
//! the worker's standard input or output. The exchange is strictly
//! alternating: one startup config line out, one ready line in, then one
//! request line out and one response line in per task — no pipelining.

use serde::{Deserialize, Serialize};

use docsift_core::TagSimilarity;

use crate::config::MatcherConfig;

/// First line sent to a freshly launched worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartupConfig {
    pub model_name: String,
    pub top_n: usize,
    pub min_similarity: f64,
    pub normalize_embeddings: bool,
}

impl From<&MatcherConfig> for StartupConfig {
    fn from(config: &MatcherConfig) -> Self {
        Self {
            model_name: config.model_name.clone(),
            top_n: config.top_n,
            min_similarity: config.min_similarity,
            normalize_embeddings: config.normalize_embeddings,
        }
    }
}

/// The single line a worker must answer startup with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadyAck {
    pub status: String,
    #[serde(default)]
    pub embedding_dim: usize,
}

impl ReadyAck {
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

/// One per-task request line.
///
/// Two accepted shapes of the same request: the delta form ships only
/// tags the worker has not embedded yet, the full form ships the whole
/// candidate list. This implementation emits the delta form; the full
/// form stays representable for workers fed by other producers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchRequest {
    Delta {
        text: String,
        new_tags: Vec<String>,
    },
    Full {
        text: String,
        existing_tags: Vec<String>,
    },
}

impl MatchRequest {
    pub fn text(&self) -> &str {
        match self {
            MatchRequest::Delta { text, .. } | MatchRequest::Full { text, .. } => text,
        }
    }
}

/// Worker-side embedding-cache counters, forwarded for observability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerCacheStats {
    #[serde(default)]
    pub cache_size: usize,
    #[serde(default)]
    pub total_hits: u64,
    #[serde(default)]
    pub total_misses: u64,
    #[serde(default)]
    pub total_hit_rate: f64,
}

/// Timing and cache counters attached to every response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    #[serde(default)]
    pub processing_time_ms: u64,
    #[serde(default)]
    pub total_tags_considered: usize,
    #[serde(default)]
    pub tags_above_threshold: usize,
    #[serde(default)]
    pub newly_cached_tags: usize,
    #[serde(default)]
    pub cache_stats: Option<WorkerCacheStats>,
}

/// One per-task response line.
///
/// A non-null `error` means the task failed upstream; `suggested_tags`
/// must then be treated as empty regardless of its contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(default)]
    pub suggested_tags: Vec<String>,
    #[serde(default)]
    pub similarities: Vec<TagSimilarity>,
    #[serde(default)]
    pub debug_info: Option<DebugInfo>,
    #[serde(default)]
    pub error: Option<String>,
}
