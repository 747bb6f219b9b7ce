//! Centralized default constants for the docsift system.
//!
//! **This module is the single source of truth** for all shared default values.
//! All crates should reference these constants instead of defining their own
//! magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// REDUCTION
// =============================================================================

/// Estimated-token threshold above which a document is reduced before
/// inference. Below it the raw text is passed through unchanged.
pub const REDUCTION_THRESHOLD_TOKENS: usize = 2000;

/// Words per chunk window.
pub const CHUNK_SIZE: usize = 150;

/// Overlapping words between adjacent chunk windows.
pub const CHUNK_OVERLAP: usize = 15;

/// Target word budget for the reduced document.
pub const TARGET_WORDS: usize = 1150;

/// Weight of the term-frequency component in the final chunk score.
pub const TF_WEIGHT: f64 = 0.4;

/// Weight of the graph-centrality component in the final chunk score.
pub const GRAPH_WEIGHT: f64 = 0.4;

/// Weight of the position component in the final chunk score.
pub const POSITION_WEIGHT: f64 = 0.2;

/// Jaccard similarity above which a remaining chunk is penalized during
/// diverse selection.
pub const DIVERSITY_THRESHOLD: f64 = 0.15;

/// Floor for the multiplicative diversity penalty.
pub const MIN_PENALTY: f64 = 0.1;

/// Estimated tokens per whitespace-separated word.
pub const TOKENS_PER_WORD: f64 = 1.3;

// =============================================================================
// CENTRALITY
// =============================================================================

/// Damping factor for the random-walk centrality iteration.
pub const CENTRALITY_DAMPING: f64 = 0.85;

/// Maximum centrality iterations before giving up on convergence.
pub const CENTRALITY_MAX_ITERATIONS: usize = 100;

/// Total absolute score delta below which the centrality iteration stops.
pub const CENTRALITY_TOLERANCE: f64 = 1e-4;

// =============================================================================
// SEMANTIC MATCHING
// =============================================================================

/// Default embedding model identifier passed to worker processes.
pub const MATCH_MODEL: &str = "all-MiniLM-L6-v2";

/// Maximum number of tag suggestions returned per request.
pub const MATCH_TOP_N: usize = 15;

/// Minimum cosine similarity for a tag to be suggested.
pub const MATCH_MIN_SIMILARITY: f64 = 0.2;

/// Known-tag count above which semantic prefiltering is worthwhile.
pub const MATCH_TAGS_THRESHOLD: usize = 15;

// =============================================================================
// WORKER POOL
// =============================================================================

/// Bounded task queue capacity (the backpressure point).
pub const POOL_QUEUE_CAPACITY: usize = 100;

/// Per-request timeout in milliseconds for a submitted task.
pub const POOL_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Timeout in milliseconds for a worker's startup handshake. Covers model
/// load time on a cold cache.
pub const POOL_STARTUP_TIMEOUT_MS: u64 = 120_000;

/// Hard cap on the worker count heuristic.
pub const WORKER_HARD_CAP: usize = 6;

/// Conservative per-worker memory estimate in MB. The default model weighs
/// ~90 MB, multilingual variants 120-420 MB.
pub const WORKER_MEMORY_MB: u64 = 200;

/// Memory reserved for the host process and OS in MB.
pub const SYSTEM_RESERVED_MB: u64 = 2048;

/// Fallback system memory assumption in MB when detection fails.
pub const FALLBACK_SYSTEM_RAM_MB: u64 = 4096;

/// Synthetic document text used for warm-up probes.
pub const WARMUP_TEXT: &str = "warm-up probe document";
