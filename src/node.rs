//! A module for working with drainage network nodes and their hydraulic
//! attributes.

use serde::Serialize;

/// Position of a node within the network hierarchy.
///
/// The kind is carried through to reports for operators; it plays no role in
/// scoring.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Primary collector on the network backbone.
    Backbone,
    /// Secondary collector feeding the backbone.
    Secondary,
    /// Peripheral inlet at the edge of the network.
    Peripheral,
}

/// Physical measurements attached to a node.
///
/// All fields are read once at graph construction and never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HydraulicAttributes {
    /// Ground elevation at the node, in meters. Expected > 0.
    pub elevation_m: f64,
    /// Design flow capacity, in m³/s. Expected > 0.
    pub flow_capacity_m3s: f64,
    /// Local rainfall intensity, in mm/h. Expected ≥ 0.
    pub rainfall_mm_h: f64,
    /// Probability of sediment blockage, in [0, 1].
    pub sediment_risk: f64,
    /// Fraction of the design capacity currently engaged, in [0, 1].
    pub hydraulic_load: f64,
}

impl HydraulicAttributes {
    /// Creates a new attribute record.
    ///
    /// # Examples
    ///
    /// ```
    /// use drainspect::node::HydraulicAttributes;
    ///
    /// let attrs = HydraulicAttributes::new(12.5, 8.0, 90.0, 0.3, 0.6);
    /// assert_eq!(attrs.elevation_m, 12.5);
    /// ```
    pub fn new(
        elevation_m: f64,
        flow_capacity_m3s: f64,
        rainfall_mm_h: f64,
        sediment_risk: f64,
        hydraulic_load: f64,
    ) -> Self {
        Self {
            elevation_m,
            flow_capacity_m3s,
            rainfall_mm_h,
            sediment_risk,
            hydraulic_load,
        }
    }
}

/// A drainage network node: a stable identifier, a hierarchy tag and the
/// hydraulic measurements taken at that point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node<T> {
    id: T,
    kind: NodeKind,
    attributes: HydraulicAttributes,
}

impl<T> Node<T> {
    /// Creates a new node.
    pub fn new(id: T, kind: NodeKind, attributes: HydraulicAttributes) -> Self {
        Self {
            id,
            kind,
            attributes,
        }
    }

    /// Returns the node identifier.
    pub fn id(&self) -> &T {
        &self.id
    }

    /// Returns the hierarchy tag.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the hydraulic measurements for this node.
    pub fn attributes(&self) -> &HydraulicAttributes {
        &self.attributes
    }
}
