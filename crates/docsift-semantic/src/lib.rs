//! # docsift-semantic
//!
//! Inference worker-pool subsystem for docsift.
//!
//! This crate provides:
//! - A newline-delimited JSON protocol spoken with external inference
//!   processes over stdin/stdout
//! - A single-worker wrapper owning one child process and its streams
//! - A pool with a bounded task queue, sequential warm-up, health checks,
//!   and cooperative shutdown
//!
//! The pool implements [`docsift_core::TagMatcher`], so callers see only
//! a submit-and-wait capability and stay unaware of process management.
//!
//! # Example
//!
//! ```rust,no_run
//! use docsift_core::TagMatcher;
//! use docsift_semantic::{MatcherConfig, PoolConfig, WorkerCommand, WorkerPool};
//!
//! #[tokio::main]
//! async fn main() -> docsift_core::Result<()> {
//!     let known_tags = vec!["invoice".to_string(), "receipt".to_string()];
//!     let pool = WorkerPool::initialize(
//!         PoolConfig::default().with_worker_count(2),
//!         MatcherConfig::default(),
//!         WorkerCommand::new("python3").with_args(["semantic_matcher.py"]),
//!         &known_tags,
//!     )
//!     .await?;
//!
//!     let outcome = pool
//!         .suggest_tags("quarterly invoice from acme", &known_tags, uuid::Uuid::new_v4())
//!         .await?;
//!     println!("{:?}", outcome.suggested_tags);
//!
//!     pool.shutdown().await
//! }
//! ```

pub mod config;
pub mod pool;
pub mod protocol;
pub mod worker;

// Re-export commonly used types at crate root
pub use config::{MatcherConfig, PoolConfig, QueuePolicy, WorkerCommand};
pub use pool::WorkerPool;
pub use protocol::{MatchRequest, MatchResponse, ReadyAck, StartupConfig};
pub use worker::{InferenceWorker, WorkerState};
