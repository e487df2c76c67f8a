//! A module for working with drainage channel edges.

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

/// A pair of nodes joined by a drainage channel. Edges don't have a
/// direction, despite the `source`-`target` nomenclature used.
///
/// An edge may carry the channel's measured flow rate. The flow rate is
/// ignored by equality and hashing: two edges over the same node pair are
/// the same channel regardless of what was measured on them.
#[derive(Clone, Debug)]
pub struct Edge<T> {
    source: T,
    target: T,
    flow_rate: Option<f64>,
}

impl<T> Edge<T> {
    /// Creates a new edge from two node identifiers.
    ///
    /// # Examples
    ///
    /// ```
    /// use drainspect::edge::Edge;
    ///
    /// let edge = Edge::new("a", "b");
    /// assert_eq!(edge, Edge::new("b", "a"));
    /// ```
    pub fn new(source: T, target: T) -> Self {
        Self {
            source,
            target,
            flow_rate: None,
        }
    }

    /// Creates a new edge carrying a flow-rate measurement (m³/s).
    ///
    /// # Examples
    ///
    /// ```
    /// use drainspect::edge::Edge;
    ///
    /// let edge = Edge::with_flow_rate("a", "b", 3.2);
    /// assert_eq!(edge.flow_rate(), Some(3.2));
    /// ```
    pub fn with_flow_rate(source: T, target: T, flow_rate: f64) -> Self {
        Self {
            source,
            target,
            flow_rate: Some(flow_rate),
        }
    }

    /// Returns the first node forming the edge.
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Returns the second node forming the edge.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Returns the flow rate measured on this channel, if any. Unused by the
    /// scoring core; carried for reporting collaborators.
    pub fn flow_rate(&self) -> Option<f64> {
        self.flow_rate
    }

    /// Returns whether the edge touches the given node.
    ///
    /// # Examples
    ///
    /// ```
    /// use drainspect::edge::Edge;
    ///
    /// let edge = Edge::new("a", "b");
    ///
    /// assert_eq!(edge.contains(&"a"), true);
    /// assert_eq!(edge.contains(&"b"), true);
    /// assert_eq!(edge.contains(&"c"), false);
    /// ```
    pub fn contains(&self, node: &T) -> bool
    where
        T: PartialEq,
    {
        self.source() == node || self.target() == node
    }
}

//
// Trait implementations
//

impl<T: PartialEq> PartialEq for Edge<T> {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.source, &self.target);
        let (c, d) = (&other.source, &other.target);

        a == d && b == c || a == c && b == d
    }
}

impl<T: Eq> Eq for Edge<T> {}

impl<T: Hash + Ord> Hash for Edge<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (a, b) = (&self.source, &self.target);

        // This ensures the hash is the same for (a, b) as it is for (b, a).
        match a.cmp(b) {
            Ordering::Greater => {
                b.hash(state);
                a.hash(state);
            }
            _ => {
                a.hash(state);
                b.hash(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new() {
        let edge = Edge::new("a", "b");

        assert_eq!(edge.source(), &"a");
        assert_eq!(edge.target(), &"b");
        assert_eq!(edge.flow_rate(), None);
    }

    #[test]
    fn with_flow_rate() {
        let edge = Edge::with_flow_rate("a", "b", 1.5);

        assert_eq!(edge.flow_rate(), Some(1.5));
    }

    #[test]
    fn contains() {
        let (a, b) = ("a", "b");
        let edge = Edge::new(a, b);

        assert!(edge.contains(&a));
        assert!(edge.contains(&b));
        assert!(!edge.contains(&"c"));
    }

    //
    // Trait implementations
    //

    #[test]
    fn partial_eq() {
        let (a, b) = ("a", "b");

        assert_eq!(Edge::new(a, b), Edge::new(a, b));
        assert_eq!(Edge::new(a, b), Edge::new(b, a));
    }

    #[test]
    fn partial_eq_ignores_flow_rate() {
        let plain = Edge::new("a", "b");
        let measured = Edge::with_flow_rate("b", "a", 9.9);

        assert_eq!(plain, measured);
    }

    #[test]
    fn hash() {
        use std::collections::hash_map::DefaultHasher;

        let (a, b) = ("a", "b");

        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();

        let k1 = Edge::new(a, b);
        let k2 = Edge::with_flow_rate(b, a, 4.0);

        k1.hash(&mut h1);
        k2.hash(&mut h2);

        // Verify k1 == k2 => hash(k1) == hash(k2), flow rate ignored.
        assert_eq!(h1.finish(), h2.finish());
    }
}
