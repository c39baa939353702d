use std::fmt;
use std::ops::Not;

/// A stable index into a network's node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The largest index an [`Edge`] can still point at; one bit goes to the complement flag.
    pub const MAX: usize = (u32::MAX >> 1) as usize;

    /// Create a node handle from an arena index.
    ///
    /// # Panics
    ///
    /// Panics if `index` exceeds [`NodeId::MAX`].
    #[must_use]
    pub fn new(index: usize) -> Self {
        assert!(index <= Self::MAX, "node index {} exceeds the 31-bit arena", index);
        Self(index as u32)
    }

    /// Returns the arena index of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl From<NodeId> for usize {
    fn from(node: NodeId) -> Self {
        node.index()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A fanin edge: a reference to a node, possibly complemented.
///
/// The least significant bit signifies inversion state, the same packing AIGER
/// literals use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(u32);

impl Edge {
    /// Create an edge pointing at `node`.
    #[must_use]
    pub const fn new(node: NodeId, complement: bool) -> Self {
        Self((node.0 << 1) | complement as u32)
    }

    /// The node this edge points at.
    #[must_use]
    pub const fn node(self) -> NodeId {
        NodeId(self.0 >> 1)
    }

    /// Returns true if the edge is inverted.
    #[must_use]
    pub const fn is_complement(self) -> bool {
        self.0 & 1 == 1
    }

    /// The same edge with the inversion stripped.
    #[must_use]
    pub const fn regular(self) -> Self {
        Self(self.0 & !1)
    }
}

impl From<NodeId> for Edge {
    fn from(node: NodeId) -> Self {
        Self::new(node, false)
    }
}

impl Not for Edge {
    type Output = Self;

    fn not(self) -> Self {
        Self(self.0 ^ 1)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_complement() {
            write!(f, "!{}", self.node())
        } else {
            write!(f, "{}", self.node())
        }
    }
}

/// What a node is, as far as reference counting cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A combinational input: a source that is never dereferenced further.
    Leaf,
    /// A logic node, owning its fanin references.
    Internal,
}

#[cfg(test)]
mod tests {
    use super::{Edge, NodeId};

    #[test]
    fn edge_packs_node_and_polarity() {
        let node = NodeId::new(21);
        let edge = Edge::new(node, true);

        assert_eq!(edge.node(), node);
        assert!(edge.is_complement());
        assert!(!(!edge).is_complement());
        assert_eq!((!edge).node(), node);
        assert_eq!(edge.regular(), Edge::from(node));
    }

    #[test]
    fn largest_index_survives_packing() {
        let node = NodeId::new(NodeId::MAX);
        assert_eq!(Edge::new(node, true).node(), node);
        assert_eq!(Edge::new(node, false).node().index(), NodeId::MAX);
    }

    #[test]
    #[should_panic(expected = "31-bit arena")]
    fn index_past_the_edge_range_panics() {
        let _ = NodeId::new(NodeId::MAX + 1);
    }

    #[test]
    fn display() {
        let node = NodeId::new(3);
        assert_eq!(node.to_string(), "n3");
        assert_eq!(Edge::new(node, false).to_string(), "n3");
        assert_eq!(Edge::new(node, true).to_string(), "!n3");
    }
}
