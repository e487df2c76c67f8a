//! Final vulnerability scoring: fusing centrality and hydraulic measures,
//! ranking, summary statistics and quantile bucketing.

use std::{fmt::Debug, hash::Hash};

use itertools::Itertools;
use nalgebra::DVector;
use serde::Serialize;

use crate::{config::ScoringWeights, graph::Graph};

/// Quantile fraction at or above which a score is classified `High`.
const HIGH_PERCENTILE: f64 = 0.70;
/// Quantile fraction at or below which a score is classified `Low`.
const LOW_PERCENTILE: f64 = 0.30;

/// Data-driven vulnerability class of a node.
///
/// Bucket boundaries are quantiles of the score distribution of the run at
/// hand, recomputed per dataset, never fixed absolute thresholds.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Score at or above the 70th percentile.
    High,
    /// Score between the two thresholds.
    Medium,
    /// Score at or below the 30th percentile.
    Low,
}

/// Per-bucket node counts, for the network summary.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct BucketCounts {
    /// Nodes classified high.
    pub high: usize,
    /// Nodes classified medium.
    pub medium: usize,
    /// Nodes classified low.
    pub low: usize,
}

/// Distribution statistics over the final score vector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SummaryStats {
    /// Mean score.
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// First quartile, median and third quartile of the scores.
    pub quartiles: [f64; 3],
}

/// One node in the ranked output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankedNode<T> {
    /// Node identifier.
    pub id: T,
    /// Dense index of the node in the graph.
    pub index: usize,
    /// Final vulnerability score in [0, 1].
    pub score: f64,
    /// Quantile bucket the score falls into.
    pub bucket: Bucket,
}

/// The ranked result table of a scoring run.
#[derive(Clone, Debug)]
pub struct Ranking<T> {
    /// Rows sorted by descending score, ties broken by ascending id.
    entries: Vec<RankedNode<T>>,
    /// Raw scores in dense index order.
    scores: DVector<f64>,
    /// Buckets in dense index order.
    buckets: Vec<Bucket>,
    stats: SummaryStats,
    low_threshold: f64,
    high_threshold: f64,
}

impl<T: Copy> Ranking<T> {
    /// Returns the ranked rows, most vulnerable first.
    pub fn entries(&self) -> &[RankedNode<T>] {
        &self.entries
    }

    /// Returns a read-only view of the `k` most vulnerable nodes.
    pub fn top(&self, k: usize) -> &[RankedNode<T>] {
        &self.entries[..k.min(self.entries.len())]
    }

    /// Returns the score of the node at the given dense index.
    pub fn score_of(&self, index: usize) -> f64 {
        self.scores[index]
    }

    /// Returns the bucket of the node at the given dense index.
    pub fn bucket_of(&self, index: usize) -> Bucket {
        self.buckets[index]
    }

    /// Returns the scores in dense index order.
    pub fn scores(&self) -> &DVector<f64> {
        &self.scores
    }

    /// Returns the distribution statistics of the scores.
    pub fn stats(&self) -> &SummaryStats {
        &self.stats
    }

    /// Returns the `(low, high)` score thresholds the buckets were cut at.
    pub fn thresholds(&self) -> (f64, f64) {
        (self.low_threshold, self.high_threshold)
    }

    /// Counts the nodes in each bucket.
    pub fn bucket_counts(&self) -> BucketCounts {
        let mut counts = BucketCounts::default();
        for bucket in &self.buckets {
            match bucket {
                Bucket::High => counts.high += 1,
                Bucket::Medium => counts.medium += 1,
                Bucket::Low => counts.low += 1,
            }
        }
        counts
    }
}

/// Fuses the three per-node measures into the final vulnerability score
/// `v(i) = w_c·c(i) + w_d·deg(i) + w_h·h(i)` and ranks the nodes.
///
/// All three inputs are expected in [0, 1] and the weights to sum to one,
/// so the output needs no clipping; that invariant holds by construction
/// upstream. Ties in the ranking are broken by ascending node identifier so
/// the output order is fully deterministic.
pub fn score<T>(
    graph: &Graph<T>,
    eigenvector_centrality: &DVector<f64>,
    degree_centrality: &DVector<f64>,
    hydraulic: &DVector<f64>,
    weights: &ScoringWeights,
) -> Ranking<T>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    let scores = eigenvector_centrality.scale(weights.centrality)
        + degree_centrality.scale(weights.degree)
        + hydraulic.scale(weights.hydraulic);

    let sorted: Vec<f64> = scores.iter().copied().sorted_by(f64::total_cmp).collect();
    let low_threshold = percentile(&sorted, LOW_PERCENTILE);
    let high_threshold = percentile(&sorted, HIGH_PERCENTILE);

    let buckets: Vec<Bucket> = scores
        .iter()
        .map(|&score| {
            if score >= high_threshold {
                Bucket::High
            } else if score <= low_threshold {
                Bucket::Low
            } else {
                Bucket::Medium
            }
        })
        .collect();

    let stats = SummaryStats {
        mean: scores.mean(),
        std_dev: scores.variance().sqrt(),
        quartiles: [
            percentile(&sorted, 0.25),
            percentile(&sorted, 0.50),
            percentile(&sorted, 0.75),
        ],
    };

    let mut entries: Vec<RankedNode<T>> = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| RankedNode {
            id: *node.id(),
            index,
            score: scores[index],
            bucket: buckets[index],
        })
        .collect();
    entries.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));

    Ranking {
        entries,
        scores,
        buckets,
        stats,
        low_threshold,
        high_threshold,
    }
}

/// Linear-interpolation percentile over an ascending-sorted slice.
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    let rank = fraction * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        edge::Edge,
        node::{HydraulicAttributes, Node, NodeKind},
    };

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    fn graph(ids: &[u32]) -> Graph<u32> {
        let attrs = HydraulicAttributes::new(10.0, 5.0, 80.0, 0.2, 0.5);
        let nodes = ids
            .iter()
            .map(|&id| Node::new(id, NodeKind::Secondary, attrs))
            .collect();
        let edges = ids
            .windows(2)
            .map(|pair| Edge::new(pair[0], pair[1]))
            .collect();

        Graph::build(nodes, edges).unwrap()
    }

    fn vector(values: &[f64]) -> DVector<f64> {
        DVector::from_column_slice(values)
    }

    #[test]
    fn fusion_formula() {
        let graph = graph(&[1, 2]);
        let ranking = score(
            &graph,
            &vector(&[1.0, 0.0]),
            &vector(&[1.0, 0.5]),
            &vector(&[1.0, 0.0]),
            &ScoringWeights::default(),
        );

        assert_close(ranking.score_of(0), 1.0);
        assert_close(ranking.score_of(1), 0.15);
        assert_eq!(ranking.entries()[0].id, 1);
        assert_eq!(ranking.entries()[1].id, 2);
    }

    #[test]
    fn ties_break_by_ascending_id() {
        let graph = graph(&[3, 1, 2]);
        let uniform = vector(&[0.4, 0.4, 0.4]);
        let ranking = score(
            &graph,
            &uniform,
            &uniform,
            &uniform,
            &ScoringWeights::default(),
        );

        let ids: Vec<u32> = ranking.entries().iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn quantile_buckets_split_30_40_30() {
        let graph = graph(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let scores = vector(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]);
        let zeros = DVector::zeros(10);

        let ranking = score(
            &graph,
            &zeros,
            &zeros,
            &scores,
            &ScoringWeights {
                centrality: 0.0,
                degree: 0.0,
                hydraulic: 1.0,
            },
        );

        let counts = ranking.bucket_counts();
        assert_eq!(counts.high, 3);
        assert_eq!(counts.medium, 4);
        assert_eq!(counts.low, 3);

        // The three highest raw scores land in the high bucket.
        assert_eq!(ranking.bucket_of(9), Bucket::High);
        assert_eq!(ranking.bucket_of(7), Bucket::High);
        assert_eq!(ranking.bucket_of(6), Bucket::Medium);
        assert_eq!(ranking.bucket_of(2), Bucket::Low);
    }

    #[test]
    fn uniform_scores_collapse_to_high() {
        // Degenerate distribution: both thresholds coincide with every
        // score, and the high test wins.
        let graph = graph(&[1, 2, 3]);
        let uniform = vector(&[0.5, 0.5, 0.5]);
        let ranking = score(
            &graph,
            &uniform,
            &uniform,
            &uniform,
            &ScoringWeights::default(),
        );

        let counts = ranking.bucket_counts();
        assert_eq!(counts.high, 3);
        assert_eq!(counts.medium, 0);
        assert_eq!(counts.low, 0);
    }

    #[test]
    fn summary_statistics() {
        let graph = graph(&[1, 2, 3]);
        let scores = vector(&[0.0, 0.5, 1.0]);
        let zeros = DVector::zeros(3);

        let ranking = score(
            &graph,
            &zeros,
            &zeros,
            &scores,
            &ScoringWeights {
                centrality: 0.0,
                degree: 0.0,
                hydraulic: 1.0,
            },
        );

        let stats = ranking.stats();
        assert_close(stats.mean, 0.5);
        assert_close(stats.std_dev, (1.0_f64 / 6.0).sqrt());
        assert_close(stats.quartiles[0], 0.25);
        assert_close(stats.quartiles[1], 0.5);
        assert_close(stats.quartiles[2], 0.75);
    }

    #[test]
    fn top_k_is_a_bounded_view() {
        let graph = graph(&[1, 2, 3]);
        let scores = vector(&[0.1, 0.9, 0.5]);
        let zeros = DVector::zeros(3);

        let ranking = score(
            &graph,
            &zeros,
            &zeros,
            &scores,
            &ScoringWeights {
                centrality: 0.0,
                degree: 0.0,
                hydraulic: 1.0,
            },
        );

        let top = ranking.top(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, 2);
        assert_eq!(top[1].id, 3);

        assert_eq!(ranking.top(100).len(), 3);
    }

    #[test]
    fn scores_remain_in_unit_interval() {
        let graph = graph(&[1, 2]);
        let ones = vector(&[1.0, 1.0]);
        let ranking = score(&graph, &ones, &ones, &ones, &ScoringWeights::default());

        for entry in ranking.entries() {
            assert!((0.0..=1.0).contains(&entry.score));
        }
    }
}
