//! Error types for docsift.

use thiserror::Error;

/// Result type alias using docsift's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for docsift operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or inconsistent configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A worker process failed to launch or acknowledge readiness
    #[error("Worker startup error: {0}")]
    WorkerStartup(String),

    /// Malformed or unexpected message on a worker's streams
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A well-formed worker response reporting an inference failure
    #[error("Inference error: {0}")]
    Inference(String),

    /// Worker infrastructure failure (worker died, pool unavailable)
    #[error("Worker error: {0}")]
    Worker(String),

    /// Task queue is at capacity and the submit policy rejects
    #[error("Task queue is full")]
    QueueFull,

    /// A submitted task did not resolve within the request timeout
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File or stream I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    /// Whether this error leaves the worker that produced it usable.
    ///
    /// Inference errors are reported by a healthy worker over an intact
    /// stream; protocol and I/O errors mean the stream state is unknown
    /// and the worker must stop taking tasks.
    pub fn is_worker_recoverable(&self) -> bool {
        matches!(self, Error::Inference(_))
    }
}
