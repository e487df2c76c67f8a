//! Engine configuration: scoring weights, convergence policy, tolerances.
//!
//! All numerical constants live in one immutable value passed into each
//! component rather than in ambient globals, so tests can run the pipeline
//! with alternate weight sets for sensitivity analysis.

use crate::error::NumericalInvariantError;

/// Absolute slack allowed when checking that a weight set sums to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Weights of the four hydraulic risk terms. Must sum to one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HydraulicWeights {
    /// Weight of the elevation risk term.
    pub elevation: f64,
    /// Weight of the rainfall-to-capacity risk term.
    pub capacity: f64,
    /// Weight of the sediment blockage risk term.
    pub sediment: f64,
    /// Weight of the hydraulic load utilisation term.
    pub load: f64,
}

impl HydraulicWeights {
    /// Checks the convex-combination invariant.
    pub fn validate(&self) -> Result<(), NumericalInvariantError> {
        let sum = self.elevation + self.capacity + self.sediment + self.load;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(NumericalInvariantError::WeightSum {
                context: "hydraulic",
                sum,
            });
        }
        Ok(())
    }
}

impl Default for HydraulicWeights {
    fn default() -> Self {
        Self {
            elevation: 0.25,
            capacity: 0.30,
            sediment: 0.25,
            load: 0.20,
        }
    }
}

/// Weights fusing centrality and hydraulics into the final score. Must sum
/// to one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoringWeights {
    /// Weight of the eigenvector (spectral) centrality.
    pub centrality: f64,
    /// Weight of the normalised degree centrality.
    pub degree: f64,
    /// Weight of the hydraulic vulnerability sub-score.
    pub hydraulic: f64,
}

impl ScoringWeights {
    /// Checks the convex-combination invariant.
    pub fn validate(&self) -> Result<(), NumericalInvariantError> {
        let sum = self.centrality + self.degree + self.hydraulic;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(NumericalInvariantError::WeightSum {
                context: "scoring",
                sum,
            });
        }
        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            centrality: 0.30,
            degree: 0.30,
            hydraulic: 0.40,
        }
    }
}

/// Immutable configuration for a full analysis run.
///
/// ```
/// use drainspect::config::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Power-iteration cap; the sole bounded-time guarantee of the pipeline.
    pub max_iterations: usize,
    /// Power-iteration convergence tolerance (L2 norm of successive
    /// iterates).
    pub tolerance: f64,
    /// Relative tolerance used to decide whether a Laplacian eigenvalue is
    /// zero. Scaled by the matrix max-norm before use.
    pub zero_tolerance: f64,
    /// Hydraulic risk term weights.
    pub hydraulic_weights: HydraulicWeights,
    /// Final score fusion weights.
    pub scoring_weights: ScoringWeights,
}

impl EngineConfig {
    /// Validates every weight set carried by the configuration.
    pub fn validate(&self) -> Result<(), NumericalInvariantError> {
        self.hydraulic_weights.validate()?;
        self.scoring_weights.validate()?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
            zero_tolerance: 1e-9,
            hydraulic_weights: HydraulicWeights::default(),
            scoring_weights: ScoringWeights::default(),
        }
    }
}
