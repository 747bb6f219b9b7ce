//! Capability traits shared across docsift crates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// One tag with its similarity score against a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSimilarity {
    pub tag: String,
    pub score: f64,
}

/// Ranked result of matching a document against the known tag set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Tags above the similarity threshold, best first, capped at the
    /// configured result count.
    pub suggested_tags: Vec<String>,
    /// Score breakdown for the suggested tags.
    pub similarities: Vec<TagSimilarity>,
}

/// Semantic tag matching as a capability.
///
/// Implementations own whatever runs the inference — a subprocess pool, an
/// in-process model, or a remote service — behind a uniform submit-and-wait
/// call. Implementations must be shareable across tasks.
#[async_trait]
pub trait TagMatcher: Send + Sync {
    /// Match `text` against `candidate_tags` and return ranked suggestions.
    ///
    /// Resolves exactly once per call, with `Ok` or with an error value;
    /// infrastructure failures never leave the caller hanging.
    async fn suggest_tags(
        &self,
        text: &str,
        candidate_tags: &[String],
        request_id: Uuid,
    ) -> Result<MatchOutcome>;

    /// Round-trip a synthetic request through the matcher.
    async fn health_check(&self) -> Result<()>;
}
