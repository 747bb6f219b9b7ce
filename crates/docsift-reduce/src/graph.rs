//! Inter-chunk similarity graph and random-walk centrality.
//!
//! Chunks that share vocabulary with many other chunks sit near the
//! document's thematic core; a damped random walk over the similarity
//! graph surfaces them the same way link-graph ranking surfaces central
//! pages.

use docsift_core::defaults::{
    CENTRALITY_DAMPING, CENTRALITY_MAX_ITERATIONS, CENTRALITY_TOLERANCE,
};

use crate::chunk::{jaccard_similarity, Chunk};

/// Dense symmetric similarity matrix over chunks.
#[derive(Debug, Clone)]
pub struct SimilarityGraph {
    pub adjacency: Vec<Vec<f64>>,
}

impl SimilarityGraph {
    /// Build the graph from pairwise Jaccard similarity of unique-token
    /// sets. The diagonal is fixed at 1.0 (self-similarity).
    pub fn build(chunks: &[Chunk]) -> Self {
        let n = chunks.len();
        let mut adjacency = vec![vec![0.0; n]; n];

        for (i, row) in adjacency.iter_mut().enumerate() {
            row[i] = 1.0;
        }

        for i in 0..n {
            for j in (i + 1)..n {
                let similarity =
                    jaccard_similarity(&chunks[i].unique_tokens, &chunks[j].unique_tokens);
                if similarity > 0.0 {
                    adjacency[i][j] = similarity;
                    adjacency[j][i] = similarity;
                }
            }
        }

        Self { adjacency }
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

/// Weighted random-walk centrality over the similarity graph.
///
/// Starts uniform, then iterates
/// `score(i) = (1 - d)/N + d * Σ_{j≠i} score(j) * w(j,i) / out(j)`
/// until the total absolute delta drops below `tolerance` or `max_iterations`
/// is hit. Self-loops contribute to each node's outgoing weight sum but are
/// excluded from the link term.
pub fn centrality_scores(
    graph: &SimilarityGraph,
    damping: f64,
    max_iterations: usize,
    tolerance: f64,
) -> Vec<f64> {
    let n = graph.len();
    if n == 0 {
        return Vec::new();
    }

    let mut scores = vec![1.0 / n as f64; n];

    let outgoing_sums: Vec<f64> = graph
        .adjacency
        .iter()
        .map(|row| row.iter().sum::<f64>())
        .collect();

    let random_component = (1.0 - damping) / n as f64;

    for _ in 0..max_iterations {
        let mut new_scores = vec![0.0; n];
        let mut total_change = 0.0;

        for i in 0..n {
            let mut link_component = 0.0;
            for j in 0..n {
                if i == j {
                    continue;
                }
                let weight = graph.adjacency[j][i];
                if weight > 0.0 && outgoing_sums[j] > 0.0 {
                    link_component += scores[j] * (weight / outgoing_sums[j]);
                }
            }

            new_scores[i] = random_component + damping * link_component;
            total_change += (new_scores[i] - scores[i]).abs();
        }

        if total_change < tolerance {
            break;
        }

        scores = new_scores;
    }

    scores
}

/// Score every chunk by graph centrality, normalized to sum to 1.
pub fn apply_graph_scores(chunks: &mut [Chunk]) {
    let graph = SimilarityGraph::build(chunks);
    let scores = centrality_scores(
        &graph,
        CENTRALITY_DAMPING,
        CENTRALITY_MAX_ITERATIONS,
        CENTRALITY_TOLERANCE,
    );

    for (chunk, score) in chunks.iter_mut().zip(&scores) {
        chunk.graph_score = *score;
    }

    let sum: f64 = scores.iter().sum();
    if sum > 0.0 {
        for chunk in chunks.iter_mut() {
            chunk.normalized_graph_score = chunk.graph_score / sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::split_into_chunks;

    fn chunks_from(text: &str, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
        let words: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        split_into_chunks(&words, chunk_size, overlap)
    }

    #[test]
    fn test_graph_diagonal_is_one() {
        let chunks = chunks_from("alpha beta gamma delta epsilon zeta", 2, 0);
        let graph = SimilarityGraph::build(&chunks);
        for (i, row) in graph.adjacency.iter().enumerate() {
            assert_eq!(row[i], 1.0);
        }
    }

    #[test]
    fn test_graph_is_symmetric() {
        let chunks = chunks_from(
            "tax invoice march tax receipt april invoice tax march",
            3,
            1,
        );
        let graph = SimilarityGraph::build(&chunks);
        for i in 0..graph.len() {
            for j in 0..graph.len() {
                assert_eq!(graph.adjacency[i][j], graph.adjacency[j][i]);
            }
        }
    }

    #[test]
    fn test_disjoint_chunks_have_zero_edges() {
        let chunks = chunks_from("alpha beta gamma delta", 2, 0);
        let graph = SimilarityGraph::build(&chunks);
        assert_eq!(graph.adjacency[0][1], 0.0);
    }

    #[test]
    fn test_centrality_empty_graph() {
        let graph = SimilarityGraph { adjacency: vec![] };
        assert!(centrality_scores(&graph, 0.85, 100, 1e-4).is_empty());
    }

    #[test]
    fn test_centrality_single_node() {
        let graph = SimilarityGraph {
            adjacency: vec![vec![1.0]],
        };
        let scores = centrality_scores(&graph, 0.85, 100, 1e-4);
        assert_eq!(scores.len(), 1);
        assert!(scores[0] > 0.0);
    }

    #[test]
    fn test_centrality_uniform_on_symmetric_clique() {
        // Three nodes all pairwise similar at the same weight: scores stay uniform
        let graph = SimilarityGraph {
            adjacency: vec![
                vec![1.0, 0.5, 0.5],
                vec![0.5, 1.0, 0.5],
                vec![0.5, 0.5, 1.0],
            ],
        };
        let scores = centrality_scores(&graph, 0.85, 100, 1e-4);
        for score in &scores {
            assert!((score - scores[0]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_centrality_favors_connected_nodes() {
        // Node 1 is linked to both others; nodes 0 and 2 only to node 1
        let graph = SimilarityGraph {
            adjacency: vec![
                vec![1.0, 0.6, 0.0],
                vec![0.6, 1.0, 0.6],
                vec![0.0, 0.6, 1.0],
            ],
        };
        let scores = centrality_scores(&graph, 0.85, 100, 1e-4);
        assert!(scores[1] > scores[0]);
        assert!(scores[1] > scores[2]);
    }

    #[test]
    fn test_apply_graph_scores_normalizes_to_one() {
        let mut chunks = chunks_from(
            "tax invoice march tax receipt april invoice tax march receipt april invoice",
            3,
            1,
        );
        assert!(chunks.len() > 1);
        apply_graph_scores(&mut chunks);

        let sum: f64 = chunks.iter().map(|c| c.normalized_graph_score).sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum was {sum}");
    }
}
