//! Spectral analysis of the network: Laplacian eigen-decomposition,
//! algebraic connectivity and spectral radius.

use std::{fmt::Debug, hash::Hash};

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use serde::Serialize;

use crate::{config::EngineConfig, error::NumericalInvariantError, graph::Graph};

/// Connectivity strength band derived from the algebraic connectivity λ₂.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityClass {
    /// λ₂ < 0.1: the network is close to splitting apart.
    Fragile,
    /// 0.1 ≤ λ₂ ≤ 0.5.
    ModeratelyVulnerable,
    /// λ₂ > 0.5.
    Robust,
}

impl ConnectivityClass {
    /// Classifies an algebraic connectivity value into its band.
    pub fn from_lambda2(lambda2: f64) -> Self {
        if lambda2 < 0.1 {
            Self::Fragile
        } else if lambda2 <= 0.5 {
            Self::ModeratelyVulnerable
        } else {
            Self::Robust
        }
    }
}

/// Shape of the connection distribution, read off the spectral radius
/// relative to the average degree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologyClass {
    /// ρ(A) > 1.5 · average degree: a few hubs dominate the network.
    HubDominated,
    /// ρ(A) > 1.2 · average degree: some significant hubs.
    Intermediate,
    /// Connections are spread evenly, mesh-like.
    Mesh,
}

impl TopologyClass {
    /// Classifies a spectral radius against the network's average degree.
    pub fn classify(spectral_radius: f64, average_degree: f64) -> Self {
        if spectral_radius > 1.5 * average_degree {
            Self::HubDominated
        } else if spectral_radius > 1.2 * average_degree {
            Self::Intermediate
        } else {
            Self::Mesh
        }
    }
}

/// The spectral decomposition of a network, along with the connectivity
/// measures derived from it.
///
/// Eigenvector signs are whatever the eigensolver produced; only magnitudes
/// and ratios are meaningful to callers.
#[derive(Clone, Debug)]
pub struct SpectralAnalysis {
    eigenvalues: Vec<f64>,
    eigenvectors: DMatrix<f64>,
    lambda2: f64,
    fiedler_vector: DVector<f64>,
    spectral_radius: f64,
    zero_multiplicity: usize,
    connectivity: ConnectivityClass,
    topology: TopologyClass,
}

impl SpectralAnalysis {
    /// Runs the full eigen-decomposition of the graph Laplacian and, from an
    /// independent decomposition of the adjacency matrix, the spectral
    /// radius.
    ///
    /// Fails with [`NumericalInvariantError::GroundEigenvalue`] if the
    /// smallest Laplacian eigenvalue is not zero within the configured
    /// tolerance (scaled by the matrix max-norm), which would mean the
    /// graph matrices are inconsistent.
    pub fn analyze<T>(
        graph: &Graph<T>,
        config: &EngineConfig,
    ) -> Result<Self, NumericalInvariantError>
    where
        T: Copy + Eq + Hash + Ord + Debug,
    {
        let laplacian = graph.laplacian_matrix();
        let tolerance = config.zero_tolerance * laplacian.amax().max(1.0);

        let pairs = sorted_eigenpairs(laplacian, true);

        let eigenvalues: Vec<f64> = pairs.iter().map(|(value, _)| *value).collect();
        check_ground_eigenvalue(eigenvalues[0], tolerance)?;

        let zero_multiplicity = eigenvalues
            .iter()
            .filter(|value| value.abs() <= tolerance)
            .count();

        // A single-node network has no second eigenvalue; it is reported as
        // having no connectivity at all.
        let (lambda2, fiedler_vector) = match pairs.get(1) {
            Some((value, vector)) => (*value, vector.clone()),
            None => (0.0, DVector::zeros(1)),
        };

        let columns: Vec<DVector<f64>> = pairs.into_iter().map(|(_, vector)| vector).collect();
        let eigenvectors = DMatrix::from_columns(&columns);

        // The spectral radius comes from the adjacency spectrum, decomposed
        // independently of the Laplacian.
        let adjacency_eigen = SymmetricEigen::new(graph.adjacency_matrix().clone());
        let spectral_radius = adjacency_eigen.eigenvalues.amax();

        Ok(Self {
            lambda2,
            fiedler_vector,
            spectral_radius,
            zero_multiplicity,
            connectivity: ConnectivityClass::from_lambda2(lambda2),
            topology: TopologyClass::classify(spectral_radius, graph.average_degree()),
            eigenvalues,
            eigenvectors,
        })
    }

    /// Returns the Laplacian eigenvalues in non-decreasing order.
    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    /// Returns the Laplacian eigenvectors as matrix columns, ordered to
    /// match [`eigenvalues`](Self::eigenvalues).
    pub fn eigenvectors(&self) -> &DMatrix<f64> {
        &self.eigenvectors
    }

    /// Returns the algebraic connectivity λ₂.
    pub fn lambda2(&self) -> f64 {
        self.lambda2
    }

    /// Returns the eigenvector associated with λ₂, for partition reporting.
    pub fn fiedler_vector(&self) -> &DVector<f64> {
        &self.fiedler_vector
    }

    /// Returns the spectral radius ρ(A) of the adjacency matrix.
    pub fn spectral_radius(&self) -> f64 {
        self.spectral_radius
    }

    /// Returns the multiplicity of the zero Laplacian eigenvalue, which
    /// equals the number of connected components.
    pub fn zero_multiplicity(&self) -> usize {
        self.zero_multiplicity
    }

    /// Returns true if the network is not a single connected component.
    pub fn is_disconnected(&self) -> bool {
        self.zero_multiplicity > 1
    }

    /// Returns the connectivity strength band.
    pub fn connectivity(&self) -> ConnectivityClass {
        self.connectivity
    }

    /// Returns the hub-dominance classification.
    pub fn topology(&self) -> TopologyClass {
        self.topology
    }
}

//
// Helpers
//

fn check_ground_eigenvalue(
    lambda1: f64,
    tolerance: f64,
) -> Result<(), NumericalInvariantError> {
    if lambda1.abs() > tolerance {
        return Err(NumericalInvariantError::GroundEigenvalue {
            lambda1,
            tolerance,
        });
    }
    Ok(())
}

/// Computes the eigenvalues and corresponding eigenvectors of the supplied
/// symmetric matrix, sorted by eigenvalue.
fn sorted_eigenpairs(matrix: DMatrix<f64>, ascending: bool) -> Vec<(f64, DVector<f64>)> {
    let eigen = SymmetricEigen::new(matrix);

    // Map eigenvalues to their eigenvectors.
    let mut pairs: Vec<(f64, DVector<f64>)> = eigen
        .eigenvalues
        .iter()
        .zip(eigen.eigenvectors.column_iter())
        .map(|(value, vector)| (*value, vector.clone_owned()))
        .collect();

    pairs.sort_unstable_by(|(a, _), (b, _)| {
        if ascending {
            a.total_cmp(b)
        } else {
            b.total_cmp(a)
        }
    });

    pairs
}
