//! A module for working with drainage network graphs.

use std::{
    collections::{BTreeMap, HashSet},
    fmt::Debug,
    hash::Hash,
};

use nalgebra::{DMatrix, DVector};

use crate::{
    edge::Edge,
    error::InvalidGraphError,
    node::{HydraulicAttributes, Node},
};

/// An undirected drainage network graph, validated at construction and
/// immutable afterwards.
///
/// The node and edge tables are checked up front (unknown references,
/// self-loops, duplicates) so that no numeric stage can ever observe an
/// inconsistent topology. The adjacency matrix and degree vector are built
/// eagerly over a dense index space; downstream components operate on dense
/// indices only, never on raw identifiers.
///
/// The index is sorted by the identifier's `Ord` implementation, which keeps
/// matrix layouts stable between runs over the same input.
#[derive(Clone, Debug)]
pub struct Graph<T> {
    /// Nodes sorted by identifier, aligned with the dense index space.
    nodes: Vec<Node<T>>,
    /// The validated edge table, as supplied.
    edges: Vec<Edge<T>>,
    /// Mapping of node identifiers to their dense indices in [0, n).
    index: BTreeMap<T, usize>,
    /// The n×n symmetric 0/1 adjacency matrix, zero diagonal.
    adjacency: DMatrix<f64>,
    /// Row sums of the adjacency matrix.
    degrees: DVector<f64>,
}

impl<T> Graph<T>
where
    T: Copy + Eq + Hash + Ord + Debug,
{
    /// Builds a graph from a node table and an edge table.
    ///
    /// Fails if the node table is empty or contains a duplicate identifier,
    /// or if any edge references an unknown node, forms a self-loop, or
    /// duplicates another edge (orientation-insensitively). Duplicate edges
    /// are rejected rather than deduplicated. Isolated nodes are legal.
    ///
    /// # Examples
    ///
    /// ```
    /// use drainspect::edge::Edge;
    /// use drainspect::graph::Graph;
    /// use drainspect::node::{HydraulicAttributes, Node, NodeKind};
    ///
    /// let attrs = HydraulicAttributes::new(12.0, 5.0, 80.0, 0.2, 0.5);
    /// let nodes = vec![
    ///     Node::new(1, NodeKind::Backbone, attrs),
    ///     Node::new(2, NodeKind::Peripheral, attrs),
    /// ];
    ///
    /// let graph = Graph::build(nodes, vec![Edge::new(1, 2)]).unwrap();
    /// assert_eq!(graph.node_count(), 2);
    /// assert_eq!(graph.edge_count(), 1);
    /// ```
    pub fn build(
        mut nodes: Vec<Node<T>>,
        edges: Vec<Edge<T>>,
    ) -> Result<Self, InvalidGraphError<T>> {
        if nodes.is_empty() {
            return Err(InvalidGraphError::Empty);
        }

        nodes.sort_by(|a, b| a.id().cmp(b.id()));
        for pair in nodes.windows(2) {
            if pair[0].id() == pair[1].id() {
                return Err(InvalidGraphError::DuplicateNode(*pair[0].id()));
            }
        }

        let index: BTreeMap<T, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (*node.id(), i))
            .collect();

        let n = nodes.len();
        let mut adjacency = DMatrix::<f64>::zeros(n, n);
        let mut seen = HashSet::with_capacity(edges.len());

        for edge in &edges {
            let (source, target) = (*edge.source(), *edge.target());

            if source == target {
                return Err(InvalidGraphError::SelfLoop(source));
            }

            let i = *index.get(&source).ok_or(InvalidGraphError::UnknownNode {
                node: source,
                source,
                target,
            })?;
            let j = *index.get(&target).ok_or(InvalidGraphError::UnknownNode {
                node: target,
                source,
                target,
            })?;

            // Duplicates are detected on the ordered dense index pair, so
            // (u, v) and (v, u) count as the same edge.
            if !seen.insert((i.min(j), i.max(j))) {
                return Err(InvalidGraphError::DuplicateEdge(source, target));
            }

            // Since edges are unique and undirected, both the upper and
            // lower triangles are written for each edge.
            adjacency[(i, j)] = 1.0;
            adjacency[(j, i)] = 1.0;
        }

        let degrees = DVector::from_iterator(n, adjacency.row_iter().map(|row| row.sum()));

        Ok(Self {
            nodes,
            edges,
            index,
            adjacency,
            degrees,
        })
    }

    /// Returns the node count of the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the edge count of the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the nodes in dense index order.
    pub fn nodes(&self) -> &[Node<T>] {
        &self.nodes
    }

    /// Returns the validated edge table.
    pub fn edges(&self) -> &[Edge<T>] {
        &self.edges
    }

    /// Returns the node stored at the given dense index.
    pub fn node(&self, index: usize) -> &Node<T> {
        &self.nodes[index]
    }

    /// Returns the hydraulic measurements at the given dense index.
    pub fn attributes(&self, index: usize) -> &HydraulicAttributes {
        self.nodes[index].attributes()
    }

    /// Returns the dense index assigned to a node identifier.
    pub fn index_of(&self, id: &T) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Returns the adjacency matrix of the graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::dmatrix;
    /// use drainspect::edge::Edge;
    /// use drainspect::graph::Graph;
    /// use drainspect::node::{HydraulicAttributes, Node, NodeKind};
    ///
    /// let attrs = HydraulicAttributes::new(12.0, 5.0, 80.0, 0.2, 0.5);
    /// let nodes = vec![
    ///     Node::new("a", NodeKind::Backbone, attrs),
    ///     Node::new("b", NodeKind::Secondary, attrs),
    /// ];
    ///
    /// let graph = Graph::build(nodes, vec![Edge::new("a", "b")]).unwrap();
    /// assert_eq!(
    ///     graph.adjacency_matrix(),
    ///     &dmatrix![0.0, 1.0;
    ///               1.0, 0.0]
    /// );
    /// ```
    pub fn adjacency_matrix(&self) -> &DMatrix<f64> {
        &self.adjacency
    }

    /// Returns the degree of each node, in dense index order.
    pub fn degrees(&self) -> &DVector<f64> {
        &self.degrees
    }

    /// Constructs the diagonal degree matrix for this graph.
    pub fn degree_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_diagonal(&self.degrees)
    }

    /// Constructs the Laplacian matrix L = D - A for this graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::dmatrix;
    /// use drainspect::edge::Edge;
    /// use drainspect::graph::Graph;
    /// use drainspect::node::{HydraulicAttributes, Node, NodeKind};
    ///
    /// let attrs = HydraulicAttributes::new(12.0, 5.0, 80.0, 0.2, 0.5);
    /// let nodes = vec![
    ///     Node::new("a", NodeKind::Backbone, attrs),
    ///     Node::new("b", NodeKind::Secondary, attrs),
    ///     Node::new("c", NodeKind::Peripheral, attrs),
    /// ];
    /// let edges = vec![Edge::new("a", "b"), Edge::new("a", "c")];
    ///
    /// let graph = Graph::build(nodes, edges).unwrap();
    /// assert_eq!(
    ///     graph.laplacian_matrix(),
    ///     dmatrix![ 2.0, -1.0, -1.0;
    ///              -1.0,  1.0,  0.0;
    ///              -1.0,  0.0,  1.0]
    /// );
    /// ```
    pub fn laplacian_matrix(&self) -> DMatrix<f64> {
        self.degree_matrix() - &self.adjacency
    }

    /// Returns the mean node degree.
    pub fn average_degree(&self) -> f64 {
        self.degrees.mean()
    }

    /// Computes the density of the graph, the ratio of edges with respect to
    /// the maximum possible edges. A single-node graph has density zero.
    pub fn density(&self) -> f64 {
        let vc = self.node_count() as f64;
        if vc < 2.0 {
            return 0.0;
        }

        let ec = self.edge_count() as f64;

        // Actual edges divided by the possible edges gives the density.
        let pec = vc * (vc - 1.0) / 2.0;
        ec / pec
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::dmatrix;

    use super::*;
    use crate::node::NodeKind;

    fn attrs() -> HydraulicAttributes {
        HydraulicAttributes::new(10.0, 5.0, 80.0, 0.2, 0.5)
    }

    fn nodes(ids: &[u32]) -> Vec<Node<u32>> {
        ids.iter()
            .map(|&id| Node::new(id, NodeKind::Secondary, attrs()))
            .collect()
    }

    #[test]
    fn build_rejects_empty_node_table() {
        let result = Graph::<u32>::build(vec![], vec![]);
        assert_eq!(result.unwrap_err(), InvalidGraphError::Empty);
    }

    #[test]
    fn build_rejects_duplicate_nodes() {
        let result = Graph::build(nodes(&[1, 2, 1]), vec![]);
        assert_eq!(result.unwrap_err(), InvalidGraphError::DuplicateNode(1));
    }

    #[test]
    fn build_rejects_unknown_node_reference() {
        let result = Graph::build(nodes(&[1, 2]), vec![Edge::new(1, 3)]);
        assert_eq!(
            result.unwrap_err(),
            InvalidGraphError::UnknownNode {
                node: 3,
                source: 1,
                target: 3,
            }
        );
    }

    #[test]
    fn build_rejects_self_loops() {
        let result = Graph::build(nodes(&[1, 2]), vec![Edge::new(1, 1)]);
        assert_eq!(result.unwrap_err(), InvalidGraphError::SelfLoop(1));
    }

    #[test]
    fn build_rejects_duplicate_edges() {
        let edges = vec![Edge::new(1, 2), Edge::new(2, 1)];
        let result = Graph::build(nodes(&[1, 2]), edges);
        assert_eq!(result.unwrap_err(), InvalidGraphError::DuplicateEdge(2, 1));
    }

    #[test]
    fn build_accepts_isolated_nodes() {
        let graph = Graph::build(nodes(&[1, 2, 3]), vec![Edge::new(1, 2)]).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.degrees()[2], 0.0);
    }

    #[test]
    fn index_is_sorted_by_id() {
        let graph = Graph::build(nodes(&[3, 1, 2]), vec![]).unwrap();

        assert_eq!(graph.index_of(&1), Some(0));
        assert_eq!(graph.index_of(&2), Some(1));
        assert_eq!(graph.index_of(&3), Some(2));
        assert_eq!(graph.index_of(&4), None);

        let ids: Vec<u32> = graph.nodes().iter().map(|node| *node.id()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn adjacency_matrix() {
        let edges = vec![Edge::new(1, 2), Edge::new(1, 3)];
        let graph = Graph::build(nodes(&[1, 2, 3]), edges).unwrap();

        assert_eq!(
            graph.adjacency_matrix(),
            &dmatrix![0.0, 1.0, 1.0;
                      1.0, 0.0, 0.0;
                      1.0, 0.0, 0.0]
        );
    }

    #[test]
    fn degree_matrix() {
        let edges = vec![Edge::new(1, 2), Edge::new(1, 3)];
        let graph = Graph::build(nodes(&[1, 2, 3]), edges).unwrap();

        assert_eq!(
            graph.degree_matrix(),
            dmatrix![2.0, 0.0, 0.0;
                     0.0, 1.0, 0.0;
                     0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn laplacian_matrix() {
        let edges = vec![Edge::new(1, 2), Edge::new(1, 3)];
        let graph = Graph::build(nodes(&[1, 2, 3]), edges).unwrap();

        assert_eq!(
            graph.laplacian_matrix(),
            dmatrix![ 2.0, -1.0, -1.0;
                     -1.0,  1.0,  0.0;
                     -1.0,  0.0,  1.0]
        );
    }

    #[test]
    fn density() {
        let graph = Graph::build(nodes(&[1]), vec![]).unwrap();
        assert_eq!(graph.density(), 0.0);

        let graph = Graph::build(nodes(&[1, 2]), vec![Edge::new(1, 2)]).unwrap();
        assert_eq!(graph.density(), 1.0);

        let edges = vec![Edge::new(1, 2), Edge::new(1, 3)];
        let graph = Graph::build(nodes(&[1, 2, 3]), edges).unwrap();
        assert_eq!(graph.density(), 2.0 / 3.0);
    }

    #[test]
    fn average_degree() {
        let edges = vec![Edge::new(1, 2), Edge::new(1, 3)];
        let graph = Graph::build(nodes(&[1, 2, 3]), edges).unwrap();

        assert_eq!(graph.average_degree(), 4.0 / 3.0);
    }

    #[test]
    fn attribute_lookup_follows_dense_index() {
        let mut table = nodes(&[2, 1]);
        table[0] = Node::new(2, NodeKind::Backbone, HydraulicAttributes::new(3.0, 5.0, 80.0, 0.2, 0.5));

        let graph = Graph::build(table, vec![Edge::new(1, 2)]).unwrap();

        // Node 1 sorts first; node 2 carries the modified elevation.
        assert_eq!(graph.attributes(0).elevation_m, 10.0);
        assert_eq!(graph.attributes(1).elevation_m, 3.0);
        assert_eq!(graph.node(1).kind(), NodeKind::Backbone);
    }
}
