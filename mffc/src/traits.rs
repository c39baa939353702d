use crate::fanout::FanoutCounts;
use crate::node::{Edge, NodeId, NodeKind};
use crate::trav::TravIds;

/// A network the cone engine can walk.
///
/// The network owns its nodes, their fanout counts and the traversal
/// generations. The engine only reads structure and mutates the two stores.
pub trait Network {
    /// Returns one past the largest node index in the network.
    fn node_count(&self) -> usize;
    /// Returns true if `node` currently exists.
    fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }
    /// Returns whether `node` is a leaf or an internal node.
    fn kind(&self, node: NodeId) -> NodeKind;
    /// Returns the number of fanins of `node`.
    fn fanin_count(&self, node: NodeId) -> usize;
    /// Returns fanin `index` of `node`.
    fn fanin(&self, node: NodeId, index: usize) -> Edge;

    /// The live-parent counters.
    fn fanouts(&self) -> &FanoutCounts;
    /// The live-parent counters, mutably.
    fn fanouts_mut(&mut self) -> &mut FanoutCounts;
    /// The traversal generations.
    fn trav_ids(&self) -> &TravIds;
    /// The traversal generations, mutably.
    fn trav_ids_mut(&mut self) -> &mut TravIds;

    /// Returns true if `node` is a combinational input.
    fn is_leaf(&self, node: NodeId) -> bool {
        self.kind(node) == NodeKind::Leaf
    }

    /// Returns the number of live parents of `node`.
    fn fanout_count(&self, node: NodeId) -> u32 {
        self.fanouts().count(node)
    }

    /// Start a new traversal generation.
    fn increment_trav_id(&mut self) -> u32 {
        self.trav_ids_mut().advance()
    }

    /// Returns true if `node` was visited in the current generation.
    fn is_trav_id_current(&self, node: NodeId) -> bool {
        self.trav_ids().is_current(node)
    }

    /// Mark `node` as visited in the current generation.
    fn set_trav_id_current(&mut self, node: NodeId) {
        self.trav_ids_mut().mark(node);
    }
}
