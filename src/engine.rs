//! The analysis pipeline: graph in, ranked vulnerability table out.

use std::{fmt::Debug, hash::Hash};

use nalgebra::DVector;
use tracing::{debug, info};

use crate::{
    centrality::{self, CentralityOutcome},
    config::EngineConfig,
    error::{AnalysisError, NumericalInvariantError},
    graph::Graph,
    hydraulics,
    node::HydraulicAttributes,
    report::{self, NetworkSummary, NodeRecord},
    scoring::{self, Ranking},
    spectral::SpectralAnalysis,
    validation::{self, ValidationReport},
};

/// The vulnerability analysis engine.
///
/// Construction validates every weight set carried by the configuration, so
/// a mis-configured engine fails before any graph is touched, never half-way
/// through a run.
///
/// # Examples
///
/// ```
/// use drainspect::config::EngineConfig;
/// use drainspect::engine::Engine;
///
/// let engine = Engine::new(EngineConfig::default()).unwrap();
/// assert_eq!(engine.config().max_iterations, 100);
/// ```
#[derive(Clone, Debug)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine, validating the configuration's weight invariants.
    pub fn new(config: EngineConfig) -> Result<Self, NumericalInvariantError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration this engine runs under.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the full pipeline over a validated graph: spectral analysis,
    /// centrality, hydraulic risk, score fusion and ranking.
    ///
    /// Fatal errors surface before any output is assembled; no partial
    /// result is ever returned.
    pub fn analyze<T>(&self, graph: &Graph<T>) -> Result<Analysis<T>, AnalysisError<T>>
    where
        T: Copy + Eq + Hash + Ord + Debug,
    {
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "starting analysis"
        );

        let spectral = SpectralAnalysis::analyze(graph, &self.config)?;
        info!(
            lambda2 = spectral.lambda2(),
            spectral_radius = spectral.spectral_radius(),
            connectivity = ?spectral.connectivity(),
            "spectral analysis complete"
        );

        let centrality = centrality::eigenvector_centrality(graph, &self.config);
        let degree_centrality = centrality::degree_centrality(graph);

        let attributes: Vec<HydraulicAttributes> = graph
            .nodes()
            .iter()
            .map(|node| *node.attributes())
            .collect();
        let hydraulic =
            hydraulics::hydraulic_vulnerability(&attributes, &self.config.hydraulic_weights);

        let ranking = scoring::score(
            graph,
            centrality.scores(),
            &degree_centrality,
            &hydraulic,
            &self.config.scoring_weights,
        );
        let records = report::node_records(
            graph,
            centrality.scores(),
            &degree_centrality,
            &hydraulic,
            &ranking,
        );
        let summary = report::summarize(graph, &spectral, &ranking);

        info!(
            score_mean = summary.score_mean,
            high = summary.bucket_counts.high,
            "analysis complete"
        );

        Ok(Analysis {
            spectral,
            centrality,
            degree_centrality,
            hydraulic,
            ranking,
            records,
            summary,
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        // The default configuration satisfies the weight invariants by
        // construction.
        Self {
            config: EngineConfig::default(),
        }
    }
}

/// Everything one pipeline run produces.
#[derive(Clone, Debug)]
pub struct Analysis<T> {
    spectral: SpectralAnalysis,
    centrality: CentralityOutcome,
    degree_centrality: DVector<f64>,
    hydraulic: DVector<f64>,
    ranking: Ranking<T>,
    records: Vec<NodeRecord<T>>,
    summary: NetworkSummary,
}

impl<T: Copy> Analysis<T> {
    /// Returns the spectral decomposition and connectivity measures.
    pub fn spectral(&self) -> &SpectralAnalysis {
        &self.spectral
    }

    /// Returns the eigenvector centrality outcome, including its
    /// convergence status.
    pub fn centrality(&self) -> &CentralityOutcome {
        &self.centrality
    }

    /// Returns the normalised degree centrality, in dense index order.
    pub fn degree_centrality(&self) -> &DVector<f64> {
        &self.degree_centrality
    }

    /// Returns the hydraulic vulnerability sub-scores, in dense index
    /// order.
    pub fn hydraulic(&self) -> &DVector<f64> {
        &self.hydraulic
    }

    /// Returns the ranked scores with statistics and buckets.
    pub fn ranking(&self) -> &Ranking<T> {
        &self.ranking
    }

    /// Returns the ranked result table, most vulnerable node first.
    pub fn records(&self) -> &[NodeRecord<T>] {
        &self.records
    }

    /// Returns the network-level summary record.
    pub fn summary(&self) -> &NetworkSummary {
        &self.summary
    }

    /// Runs the statistical validation suite over the result table.
    pub fn validate(&self) -> ValidationReport {
        validation::validate(&self.records)
    }
}
