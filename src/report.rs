//! Outward-facing result tables handed to reporting and CLI collaborators.
//!
//! These types are plain data with [`serde::Serialize`] derives so callers
//! can emit CSV or JSON without re-modelling the engine's output.

use std::{fmt::Debug, hash::Hash};

use nalgebra::DVector;
use serde::Serialize;

use crate::{
    graph::Graph,
    node::NodeKind,
    scoring::{Bucket, BucketCounts, Ranking},
    spectral::{ConnectivityClass, SpectralAnalysis, TopologyClass},
};

/// One row of the ranked result table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeRecord<T> {
    /// Node identifier.
    pub id: T,
    /// Hierarchy tag, carried through for operators.
    pub kind: NodeKind,
    /// Node degree.
    pub degree: u32,
    /// Final fused vulnerability score in [0, 1].
    pub vulnerability_score: f64,
    /// Power-iteration eigenvector centrality in [0, 1].
    pub eigenvector_centrality: f64,
    /// Degree centrality, normalised by `n - 1`.
    pub degree_centrality: f64,
    /// Hydraulic vulnerability sub-score in [0, 1].
    pub hydraulic_score: f64,
    /// Ground elevation, meters.
    pub elevation_m: f64,
    /// Design flow capacity, m³/s.
    pub flow_capacity_m3s: f64,
    /// Rainfall intensity, mm/h.
    pub rainfall_mm_h: f64,
    /// Sediment blockage probability.
    pub sediment_risk: f64,
    /// Capacity-utilisation fraction.
    pub hydraulic_load: f64,
    /// Quantile classification of the score.
    pub bucket: Bucket,
}

/// Network-level summary record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NetworkSummary {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of edges.
    pub edge_count: usize,
    /// Mean node degree.
    pub average_degree: f64,
    /// Edge density relative to the complete graph.
    pub density: f64,
    /// Algebraic connectivity λ₂.
    pub lambda2: f64,
    /// Spectral radius ρ(A).
    pub spectral_radius: f64,
    /// Connectivity strength band.
    pub connectivity: ConnectivityClass,
    /// Hub-dominance classification.
    pub topology: TopologyClass,
    /// Node counts per vulnerability bucket.
    pub bucket_counts: BucketCounts,
    /// Mean vulnerability score.
    pub score_mean: f64,
    /// Population standard deviation of the scores.
    pub score_std_dev: f64,
}

/// Assembles the ranked result table, one row per node, most vulnerable
/// first.
pub fn node_records<T>(
    graph: &Graph<T>,
    eigenvector_centrality: &DVector<f64>,
    degree_centrality: &DVector<f64>,
    hydraulic: &DVector<f64>,
    ranking: &Ranking<T>,
) -> Vec<NodeRecord<T>>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    ranking
        .entries()
        .iter()
        .map(|entry| {
            let attrs = graph.attributes(entry.index);

            NodeRecord {
                id: entry.id,
                kind: graph.node(entry.index).kind(),
                degree: graph.degrees()[entry.index] as u32,
                vulnerability_score: entry.score,
                eigenvector_centrality: eigenvector_centrality[entry.index],
                degree_centrality: degree_centrality[entry.index],
                hydraulic_score: hydraulic[entry.index],
                elevation_m: attrs.elevation_m,
                flow_capacity_m3s: attrs.flow_capacity_m3s,
                rainfall_mm_h: attrs.rainfall_mm_h,
                sediment_risk: attrs.sediment_risk,
                hydraulic_load: attrs.hydraulic_load,
                bucket: entry.bucket,
            }
        })
        .collect()
}

/// Assembles the network-level summary record.
pub fn summarize<T>(
    graph: &Graph<T>,
    spectral: &SpectralAnalysis,
    ranking: &Ranking<T>,
) -> NetworkSummary
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    NetworkSummary {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        average_degree: graph.average_degree(),
        density: graph.density(),
        lambda2: spectral.lambda2(),
        spectral_radius: spectral.spectral_radius(),
        connectivity: spectral.connectivity(),
        topology: spectral.topology(),
        bucket_counts: ranking.bucket_counts(),
        score_mean: ranking.stats().mean,
        score_std_dev: ranking.stats().std_dev,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::scoring::Bucket;

    #[test]
    fn record_wire_shape_is_stable() {
        let record = NodeRecord {
            id: 7u32,
            kind: NodeKind::Backbone,
            degree: 3,
            vulnerability_score: 0.82,
            eigenvector_centrality: 1.0,
            degree_centrality: 0.75,
            hydraulic_score: 0.6,
            elevation_m: 4.5,
            flow_capacity_m3s: 12.0,
            rainfall_mm_h: 95.0,
            sediment_risk: 0.35,
            hydraulic_load: 0.7,
            bucket: Bucket::High,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "kind": "backbone",
                "degree": 3,
                "vulnerability_score": 0.82,
                "eigenvector_centrality": 1.0,
                "degree_centrality": 0.75,
                "hydraulic_score": 0.6,
                "elevation_m": 4.5,
                "flow_capacity_m3s": 12.0,
                "rainfall_mm_h": 95.0,
                "sediment_risk": 0.35,
                "hydraulic_load": 0.7,
                "bucket": "high",
            })
        );
    }
}
