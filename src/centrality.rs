//! Node centrality measures: power-iteration eigenvector centrality and
//! normalised degree centrality.

use std::{fmt::Debug, hash::Hash};

use nalgebra::DVector;
use tracing::{debug, warn};

use crate::{config::EngineConfig, graph::Graph};

/// Iterate norms below this are treated as numerically zero.
const VANISHING_NORM: f64 = 1e-12;

/// How a power-iteration run ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CentralityStatus {
    /// Successive iterates came within tolerance of each other.
    Converged {
        /// Number of multiply-normalise steps performed.
        iterations: usize,
    },
    /// The iteration cap was hit before the tolerance was met. The scores
    /// are the best available estimate; expected for bipartite-like spectra
    /// whose dominant eigenvalues share a magnitude.
    MaxIterations,
    /// The iterate norm vanished (edgeless network). The scores are all
    /// zero.
    Degenerate,
}

/// The result of a centrality computation: per-node scores rescaled to
/// [0, 1] and the convergence status they were obtained under.
#[derive(Clone, Debug)]
pub struct CentralityOutcome {
    scores: DVector<f64>,
    status: CentralityStatus,
}

impl CentralityOutcome {
    /// Returns the per-node centrality scores, in dense index order. Each
    /// entry lies in [0, 1]; the least-central node maps to 0 and the most
    /// central to 1.
    pub fn scores(&self) -> &DVector<f64> {
        &self.scores
    }

    /// Returns how the computation ended.
    pub fn status(&self) -> CentralityStatus {
        self.status
    }

    /// Returns true if the scores are a degenerate all-zero vector.
    pub fn is_degenerate(&self) -> bool {
        self.status == CentralityStatus::Degenerate
    }
}

/// Computes eigenvector centrality by power iteration over the adjacency
/// matrix.
///
/// Starts from the normalised all-ones vector and repeats
/// `x ← A·x / ‖A·x‖₂` until successive iterates differ by less than the
/// configured tolerance in L2 norm, or the iteration cap is reached. Hitting
/// the cap is reported through [`CentralityStatus::MaxIterations`] rather
/// than an error, since the best estimate is still informative for ranking.
///
/// On a disconnected network the iteration converges to the centrality
/// structure of the dominant component only; the other components score
/// zero.
pub fn eigenvector_centrality<T>(graph: &Graph<T>, config: &EngineConfig) -> CentralityOutcome
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    let adjacency = graph.adjacency_matrix();
    let n = graph.node_count();

    let mut x = DVector::from_element(n, 1.0 / (n as f64).sqrt());
    let mut status = CentralityStatus::MaxIterations;

    for iteration in 0..config.max_iterations {
        let mut next = adjacency * &x;
        let norm = next.norm();

        if norm < VANISHING_NORM {
            warn!(iteration, "iterate norm vanished, centrality is degenerate");
            return CentralityOutcome {
                scores: DVector::zeros(n),
                status: CentralityStatus::Degenerate,
            };
        }

        next.unscale_mut(norm);
        let delta = (&next - &x).norm();
        x = next;

        if delta < config.tolerance {
            status = CentralityStatus::Converged {
                iterations: iteration + 1,
            };
            break;
        }
    }

    match status {
        CentralityStatus::Converged { iterations } => {
            debug!(iterations, "power iteration converged");
        }
        _ => {
            warn!(
                max_iterations = config.max_iterations,
                "power iteration did not converge, returning best estimate"
            );
        }
    }

    CentralityOutcome {
        scores: rescale_unit(x),
        status,
    }
}

/// Computes degree centrality normalised by the maximum possible degree in
/// a simple graph, `degree(i) / (n - 1)`. A single-node network scores zero
/// rather than dividing by zero.
pub fn degree_centrality<T>(graph: &Graph<T>) -> DVector<f64>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    let n = graph.node_count();
    if n < 2 {
        return DVector::zeros(n);
    }

    graph.degrees().unscale((n - 1) as f64)
}

/// Maps a raw eigenvector estimate onto [0, 1]: absolute values, shifted so
/// the minimum is 0 and rescaled so the maximum is 1. Signs are discarded
/// because the eigensolver direction is arbitrary.
fn rescale_unit(x: DVector<f64>) -> DVector<f64> {
    let mut scores = x.abs();

    let min = scores.min();
    scores.add_scalar_mut(-min);

    let max = scores.max();
    if max > 0.0 {
        scores.unscale_mut(max);
    }

    scores
}

#[cfg(test)]
mod tests {
    use nalgebra::SymmetricEigen;

    use super::*;
    use crate::{
        edge::Edge,
        node::{HydraulicAttributes, Node, NodeKind},
    };

    fn graph(ids: &[u32], edges: &[(u32, u32)]) -> Graph<u32> {
        let attrs = HydraulicAttributes::new(10.0, 5.0, 80.0, 0.2, 0.5);
        let nodes = ids
            .iter()
            .map(|&id| Node::new(id, NodeKind::Secondary, attrs))
            .collect();
        let edges = edges.iter().map(|&(a, b)| Edge::new(a, b)).collect();

        Graph::build(nodes, edges).unwrap()
    }

    #[test]
    fn regular_graph_converges_immediately() {
        // The all-ones start vector is already the dominant eigenvector of
        // any regular graph.
        let graph = graph(&[1, 2, 3, 4], &[(1, 2), (2, 3), (3, 4), (4, 1)]);
        let outcome = eigenvector_centrality(&graph, &EngineConfig::default());

        assert_eq!(outcome.status(), CentralityStatus::Converged { iterations: 1 });

        // All nodes are equally central; the min-anchored rescale maps a
        // uniform vector to zero everywhere.
        for score in outcome.scores().iter() {
            assert_eq!(*score, 0.0);
        }
    }

    #[test]
    fn matches_direct_eigendecomposition() {
        // Triangle with a pendant tail: connected and non-bipartite, so
        // power iteration must converge to the dominant eigenvector of A.
        let graph = graph(&[1, 2, 3, 4], &[(1, 2), (2, 3), (3, 1), (3, 4)]);
        let outcome = eigenvector_centrality(&graph, &EngineConfig::default());

        assert!(matches!(outcome.status(), CentralityStatus::Converged { .. }));

        let eigen = SymmetricEigen::new(graph.adjacency_matrix().clone());
        let mut dominant = 0;
        for (i, value) in eigen.eigenvalues.iter().enumerate() {
            if *value > eigen.eigenvalues[dominant] {
                dominant = i;
            }
        }
        let reference = rescale_unit(eigen.eigenvectors.column(dominant).clone_owned());

        for (computed, expected) in outcome.scores().iter().zip(reference.iter()) {
            assert!(
                (computed - expected).abs() < 1e-4,
                "expected {expected}, got {computed}"
            );
        }
    }

    #[test]
    fn bipartite_oscillation_hits_iteration_cap() {
        // K₁,₄ has adjacency eigenvalues ±2 of equal magnitude; the power
        // iteration oscillates with period two and never meets tolerance.
        let graph = graph(&[1, 2, 3, 4, 5], &[(1, 2), (1, 3), (1, 4), (1, 5)]);
        let outcome = eigenvector_centrality(&graph, &EngineConfig::default());

        assert_eq!(outcome.status(), CentralityStatus::MaxIterations);
        assert!(!outcome.is_degenerate());
        for score in outcome.scores().iter() {
            assert!(score.is_finite());
            assert!((0.0..=1.0).contains(score));
        }
    }

    #[test]
    fn edgeless_network_is_degenerate() {
        let graph = graph(&[1, 2, 3], &[]);
        let outcome = eigenvector_centrality(&graph, &EngineConfig::default());

        assert!(outcome.is_degenerate());
        assert_eq!(outcome.status(), CentralityStatus::Degenerate);
        for score in outcome.scores().iter() {
            assert_eq!(*score, 0.0);
        }
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let graph = graph(
            &[1, 2, 3, 4, 5],
            &[(1, 2), (2, 3), (3, 1), (3, 4), (4, 5)],
        );
        let outcome = eigenvector_centrality(&graph, &EngineConfig::default());

        let scores = outcome.scores();
        assert_eq!(scores.min(), 0.0);
        assert_eq!(scores.max(), 1.0);
    }

    #[test]
    fn degree_centrality_normalises_by_max_possible() {
        let graph = graph(&[1, 2, 3, 4, 5], &[(1, 2), (1, 3), (1, 4), (1, 5)]);
        let centrality = degree_centrality(&graph);

        assert_eq!(centrality[0], 1.0);
        for leaf in 1..5 {
            assert_eq!(centrality[leaf], 0.25);
        }
    }

    #[test]
    fn degree_centrality_single_node() {
        let graph = graph(&[1], &[]);
        let centrality = degree_centrality(&graph);

        assert_eq!(centrality.len(), 1);
        assert_eq!(centrality[0], 0.0);
    }
}
