//! Worker-pool and matcher configuration.

use serde::{Deserialize, Serialize};

use docsift_core::defaults;
use docsift_core::{Error, Result};

/// Behavior when a task is submitted to a full queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueuePolicy {
    /// Wait for a queue slot to free up.
    #[default]
    Block,
    /// Fail immediately with a queue-full error.
    Reject,
}

/// Command line used to launch one worker process.
///
/// Environment provisioning (interpreters, model downloads) is the
/// caller's concern; the pool only launches what it is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerCommand {
    /// Program to execute.
    pub program: String,
    /// Arguments passed to the program.
    #[serde(default)]
    pub args: Vec<String>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Matching parameters sent to every worker at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Embedding model identifier.
    pub model_name: String,
    /// Maximum number of suggestions per request.
    pub top_n: usize,
    /// Minimum similarity for a tag to be suggested.
    pub min_similarity: f64,
    /// Whether workers should L2-normalize embeddings.
    pub normalize_embeddings: bool,
    /// Known-tag count above which semantic prefiltering applies.
    pub tags_threshold: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            model_name: defaults::MATCH_MODEL.to_string(),
            top_n: defaults::MATCH_TOP_N,
            min_similarity: defaults::MATCH_MIN_SIMILARITY,
            normalize_embeddings: true,
            tags_threshold: defaults::MATCH_TAGS_THRESHOLD,
        }
    }
}

impl MatcherConfig {
    /// Validate internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.model_name.is_empty() {
            return Err(Error::Config("model_name cannot be empty".to_string()));
        }
        if self.top_n == 0 {
            return Err(Error::Config("top_n must be positive".to_string()));
        }
        if !(-1.0..=1.0).contains(&self.min_similarity) {
            return Err(Error::Config(format!(
                "min_similarity must be within [-1, 1], got {}",
                self.min_similarity
            )));
        }
        Ok(())
    }
}

/// Configuration for the worker pool itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of worker processes.
    pub worker_count: usize,
    /// Bounded task queue capacity.
    pub queue_capacity: usize,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Startup handshake timeout in milliseconds.
    pub startup_timeout_ms: u64,
    /// Behavior on queue saturation.
    pub submit_policy: QueuePolicy,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_count: docsift_core::default_worker_count(),
            queue_capacity: defaults::POOL_QUEUE_CAPACITY,
            request_timeout_ms: defaults::POOL_REQUEST_TIMEOUT_MS,
            startup_timeout_ms: defaults::POOL_STARTUP_TIMEOUT_MS,
            submit_policy: QueuePolicy::Block,
        }
    }
}

impl PoolConfig {
    /// Set the worker count.
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    /// Set the queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout_ms(mut self, ms: u64) -> Self {
        self.request_timeout_ms = ms;
        self
    }

    /// Set the submit policy.
    pub fn with_submit_policy(mut self, policy: QueuePolicy) -> Self {
        self.submit_policy = policy;
        self
    }

    /// Validate internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(Error::Config("worker_count must be positive".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(Error::Config("queue_capacity must be positive".to_string()));
        }
        if self.request_timeout_ms == 0 {
            return Err(Error::Config(
                "request_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
