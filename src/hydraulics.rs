//! Hydraulic risk model: physical vulnerability from node measurements,
//! independent of graph topology.

use nalgebra::DVector;

use crate::{config::HydraulicWeights, node::HydraulicAttributes};

/// Rainfall intensity (mm/h) per m³/s of capacity at which a channel is
/// considered to run at design exceedance.
const CAPACITY_DESIGN_FACTOR: f64 = 10.0;

/// Computes the hydraulic vulnerability sub-score for every node.
///
/// Four risk terms are combined as a convex combination under the supplied
/// weights:
///
/// - elevation risk: lower-lying nodes flood first. Normalised against the
///   observed elevation range of the dataset, so it affects absolute scores
///   but not the rank order within a run; a flat network scores 0.5
///   everywhere.
/// - capacity risk: rainfall intensity against design capacity, saturating
///   at 1 once the design point is exceeded.
/// - sediment risk: the blockage probability, taken as-is.
/// - load risk: the capacity-utilisation fraction, taken as-is.
///
/// The result is clamped to [0, 1] even though the convex combination
/// guarantees the range for in-range inputs, so malformed upstream
/// attributes cannot push a score out of its documented interval.
pub fn hydraulic_vulnerability(
    attributes: &[HydraulicAttributes],
    weights: &HydraulicWeights,
) -> DVector<f64> {
    let (min_elevation, max_elevation) = elevation_range(attributes);
    let span = max_elevation - min_elevation;

    DVector::from_iterator(
        attributes.len(),
        attributes.iter().map(|attrs| {
            let elevation_risk = if span > 0.0 {
                1.0 - (attrs.elevation_m - min_elevation) / span
            } else {
                // Flat network: elevation carries no ranking signal.
                0.5
            };

            let capacity_risk = if attrs.flow_capacity_m3s > 0.0 {
                (attrs.rainfall_mm_h / (CAPACITY_DESIGN_FACTOR * attrs.flow_capacity_m3s))
                    .clamp(0.0, 1.0)
            } else {
                // A channel with no capacity is saturated by definition.
                1.0
            };

            let score = weights.elevation * elevation_risk
                + weights.capacity * capacity_risk
                + weights.sediment * attrs.sediment_risk
                + weights.load * attrs.hydraulic_load;

            score.clamp(0.0, 1.0)
        }),
    )
}

fn elevation_range(attributes: &[HydraulicAttributes]) -> (f64, f64) {
    attributes.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(min, max), attrs| (min.min(attrs.elevation_m), max.max(attrs.elevation_m)),
    )
}
