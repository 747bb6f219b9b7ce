//! # docsift-reduce
//!
//! Content-reduction pipeline for docsift.
//!
//! Long documents blow the context budget of downstream inference, so this
//! crate shrinks them to a target word count while keeping the passages
//! that matter: text is split into overlapping word windows, each window
//! is scored by term frequency, similarity-graph centrality, and position,
//! and a greedy diversity-aware selection reassembles the winners in
//! document order.

pub mod chunk;
pub mod config;
pub mod graph;
pub mod pipeline;
pub mod scoring;
pub mod selection;

// Re-export commonly used types at crate root
pub use chunk::{jaccard_similarity, split_into_chunks, Chunk};
pub use config::ReductionConfig;
pub use graph::SimilarityGraph;
pub use pipeline::{estimate_tokens, reduce, should_reduce};
