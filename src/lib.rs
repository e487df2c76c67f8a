//! Drainspect is a small toolkit for ranking the nodes of a drainage
//! network by failure risk, fusing graph-spectral structure (algebraic
//! connectivity, spectral radius, eigenvector centrality) with physical
//! hydraulic attributes (elevation, capacity, rainfall, sediment, load).
//!
//! # Basic usage
//!
//! The library is centered around the [`Graph`](graph::Graph) structure,
//! built from [`Node`](node::Node) and [`Edge`](edge::Edge) tables and
//! validated up front. An [`Engine`](engine::Engine) runs the full pipeline
//! over it and returns a ranked result table plus summary statistics.
//!
//! ```rust
//! use drainspect::edge::Edge;
//! use drainspect::engine::Engine;
//! use drainspect::graph::Graph;
//! use drainspect::node::{HydraulicAttributes, Node, NodeKind};
//!
//! // A small catchment: a backbone junction (3) joining two secondary
//! // collectors in a loop, with a peripheral inlet (4) hanging off it.
//! let nodes = vec![
//!     Node::new(1, NodeKind::Secondary, HydraulicAttributes::new(4.0, 12.0, 95.0, 0.4, 0.8)),
//!     Node::new(2, NodeKind::Secondary, HydraulicAttributes::new(9.0, 8.0, 95.0, 0.2, 0.5)),
//!     Node::new(3, NodeKind::Backbone, HydraulicAttributes::new(11.0, 8.0, 95.0, 0.3, 0.4)),
//!     Node::new(4, NodeKind::Peripheral, HydraulicAttributes::new(15.0, 5.0, 95.0, 0.1, 0.3)),
//! ];
//! let edges = vec![
//!     Edge::new(1, 2),
//!     Edge::new(1, 3),
//!     Edge::new(2, 3),
//!     Edge::new(3, 4),
//! ];
//!
//! let graph = Graph::build(nodes, edges).unwrap();
//! let analysis = Engine::default().analyze(&graph).unwrap();
//!
//! // The junction carrying the whole catchment tops the ranking.
//! assert_eq!(analysis.records()[0].id, 3);
//!
//! // Network-level measures land in the summary record.
//! let summary = analysis.summary();
//! assert_eq!(summary.node_count, 4);
//! assert!(summary.lambda2 > 0.0);
//! ```

pub mod centrality;
pub mod config;
pub mod edge;
pub mod engine;
pub mod error;
pub mod graph;
pub mod hydraulics;
pub mod node;
pub mod report;
pub mod scoring;
pub mod spectral;
pub mod validation;
