//! Statistical validation of a finished analysis.
//!
//! The scoring formula promises a handful of monotonic relationships; this
//! module checks them on the actual output table with rank correlations, so
//! a refactoring that silently inverts a term is caught by data rather than
//! by inspection.

use crate::report::NodeRecord;

/// Outcome of one validation check.
#[derive(Clone, Debug, PartialEq)]
pub struct Check {
    /// Short machine-readable name of the relationship checked.
    pub name: &'static str,
    /// The computed statistic (a rank correlation, or a violation
    /// distance for range checks).
    pub statistic: f64,
    /// Whether the expectation held.
    pub passed: bool,
}

/// All checks run against one analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationReport {
    checks: Vec<Check>,
}

impl ValidationReport {
    /// Returns the individual check outcomes.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Returns true if every check passed.
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }
}

/// Runs the validation suite over a ranked result table.
///
/// Degenerate inputs (zero variance in either variable) pass vacuously
/// with a statistic of zero: a network where every node has the same
/// sediment risk says nothing about the sediment term either way.
pub fn validate<T>(records: &[NodeRecord<T>]) -> ValidationReport {
    let sediment: Vec<f64> = records.iter().map(|r| r.sediment_risk).collect();
    let hydraulic: Vec<f64> = records.iter().map(|r| r.hydraulic_score).collect();
    let degree: Vec<f64> = records.iter().map(|r| r.degree as f64).collect();
    let vulnerability: Vec<f64> = records.iter().map(|r| r.vulnerability_score).collect();

    let sediment_corr = spearman(&sediment, &hydraulic);
    let degree_corr = spearman(&degree, &vulnerability);
    let range_violation = unit_interval_violation(records);

    let checks = vec![
        Check {
            name: "hydraulic_tracks_sediment",
            statistic: sediment_corr,
            passed: sediment_corr >= 0.0,
        },
        Check {
            name: "vulnerability_tracks_degree",
            statistic: degree_corr,
            passed: degree_corr >= 0.0,
        },
        Check {
            name: "scores_within_unit_interval",
            statistic: range_violation,
            passed: range_violation == 0.0,
        },
    ];

    ValidationReport { checks }
}

/// Spearman rank correlation: Pearson correlation over average-rank
/// transformed data. Returns 0 when either variable has no variance.
pub fn spearman(x: &[f64], y: &[f64]) -> f64 {
    pearson(&ranks(x), &ranks(y))
}

/// Assigns 1-based ranks, averaging over tie groups.
fn ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }

        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }

        i = j + 1;
    }

    ranks
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() < 2 {
        return 0.0;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    if variance_x <= 0.0 || variance_y <= 0.0 {
        return 0.0;
    }

    covariance / (variance_x.sqrt() * variance_y.sqrt())
}

fn unit_interval_violation<T>(records: &[NodeRecord<T>]) -> f64 {
    records
        .iter()
        .flat_map(|r| {
            [
                r.vulnerability_score,
                r.eigenvector_centrality,
                r.degree_centrality,
                r.hydraulic_score,
            ]
        })
        .map(|value| (-value).max(value - 1.0).max(0.0))
        .fold(0.0, f64::max)
}
