//! Structured logging schema and field name constants for docsift.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data (chunks, similarities) |

use tracing_subscriber::EnvFilter;

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from request intake through pool dispatch.
pub const REQUEST_ID: &str = "request_id";

/// Component within the subsystem.
/// Examples: "chunker", "selector", "pool", "worker", "tag_cache"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "reduce", "suggest_tags", "warm_up", "shutdown"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Numeric worker identifier within the pool.
pub const WORKER_ID: &str = "worker_id";

/// Embedding model identifier in use.
pub const MODEL: &str = "model";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of chunks produced or selected during reduction.
pub const CHUNK_COUNT: &str = "chunk_count";

/// Number of tag names involved in an operation.
pub const TAG_COUNT: &str = "tag_count";

/// Number of pending tasks in the pool queue.
pub const QUEUE_DEPTH: &str = "queue_depth";

/// Word count of a document or reduced output.
pub const WORD_COUNT: &str = "word_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Install a global tracing subscriber honoring `RUST_LOG`, falling back
/// to the given directive when the variable is unset.
///
/// Safe to call more than once; subsequent calls are no-ops.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
