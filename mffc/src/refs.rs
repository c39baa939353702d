//! Reference counting over the fanin cone of a node.
//!
//! Dereferencing a node walks its fanins, dropping one live parent from each.
//! A fanin whose count reaches zero has no consumer left, so it is dead too and
//! the walk continues below it. Referencing is the mirror image and restores
//! the counts. The number of nodes the walk passes through is the size of the
//! maximum fanout-free cone (MFFC) of the node.
//!
//! Every size query here performs a dereference followed by a reference and
//! checks that both walks agree; a disagreement means the counts were already
//! corrupt and is fatal.

use log::trace;

use crate::config::MffcConfig;
use crate::node::{Edge, NodeId};
use crate::traits::Network;

/// Which fanin edges take part in reference counting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgePolicy {
    /// Every fanin edge is counted.
    #[default]
    All,
    /// Complemented fanin edges are skipped, so the cone never crosses an inverter.
    StopAtComplement,
}

impl EdgePolicy {
    /// Returns true if `edge` is counted under this policy.
    #[must_use]
    pub const fn admits(self, edge: Edge) -> bool {
        match self {
            Self::All => true,
            Self::StopAtComplement => !edge.is_complement(),
        }
    }
}

/// How the engine walks the graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Plain recursion. Depth is bounded by the longest chain in the cone.
    #[default]
    Recursive,
    /// An explicit work stack, for networks with very deep chains.
    Iterative,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Reference,
    Dereference,
}

/// A configured reference or dereference walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefWalk {
    /// Which fanin edges are counted.
    pub policy: EdgePolicy,
    /// Stamp every non-leaf node reached with the current traversal generation.
    pub label: bool,
    /// Recursion or explicit stack.
    pub traversal: Traversal,
}

impl RefWalk {
    /// A walk over all edges, without labelling, using recursion.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            policy: EdgePolicy::All,
            label: false,
            traversal: Traversal::Recursive,
        }
    }

    /// Use `policy` to pick the counted edges.
    #[must_use]
    pub const fn policy(mut self, policy: EdgePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Stamp the nodes of the cone while walking.
    #[must_use]
    pub const fn label(mut self, label: bool) -> Self {
        self.label = label;
        self
    }

    /// Walk with `traversal`.
    #[must_use]
    pub const fn traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Dereference `node`, returning the number of nodes that became dead, `node` included.
    ///
    /// Returns 0 for a leaf.
    ///
    /// # Panics
    ///
    /// Panics if a counted fanin already has no live parents.
    pub fn deref<N: Network + ?Sized>(self, net: &mut N, node: NodeId) -> usize {
        self.walk(net, node, Direction::Dereference)
    }

    /// Reference `node`, returning the number of nodes that came back to life, `node` included.
    ///
    /// Returns 0 for a leaf.
    pub fn reference<N: Network + ?Sized>(self, net: &mut N, node: NodeId) -> usize {
        self.walk(net, node, Direction::Reference)
    }

    fn walk<N: Network + ?Sized>(self, net: &mut N, node: NodeId, direction: Direction) -> usize {
        match self.traversal {
            Traversal::Recursive => self.walk_rec(net, node, direction),
            Traversal::Iterative => self.walk_iter(net, node, direction),
        }
    }

    fn walk_rec<N: Network + ?Sized>(self, net: &mut N, node: NodeId, direction: Direction) -> usize {
        if net.is_leaf(node) {
            return 0;
        }
        if self.label {
            net.set_trav_id_current(node);
        }
        let mut count = 1;
        for index in 0..net.fanin_count(node) {
            let edge = net.fanin(node, index);
            if self.policy.admits(edge) && step(net, edge.node(), direction) {
                count += self.walk_rec(net, edge.node(), direction);
            }
        }
        count
    }

    fn walk_iter<N: Network + ?Sized>(self, net: &mut N, node: NodeId, direction: Direction) -> usize {
        let mut stack = vec![node];
        let mut count = 0;
        while let Some(node) = stack.pop() {
            if net.is_leaf(node) {
                continue;
            }
            if self.label {
                net.set_trav_id_current(node);
            }
            count += 1;
            for index in 0..net.fanin_count(node) {
                let edge = net.fanin(node, index);
                if self.policy.admits(edge) && step(net, edge.node(), direction) {
                    stack.push(edge.node());
                }
            }
        }
        count
    }
}

/// Move one parent on `fanin`; returns true if the fanin changed liveness.
fn step<N: Network + ?Sized>(net: &mut N, fanin: NodeId, direction: Direction) -> bool {
    match direction {
        Direction::Dereference => net.fanouts_mut().decrement(fanin) == 0,
        Direction::Reference => net.fanouts_mut().increment(fanin) == 0,
    }
}

/// Dereference every fanin of `node`, recursing into fanins left without parents.
///
/// Walks recursively; deep networks want [`RefWalk`] with [`Traversal::Iterative`].
pub fn deref_node<N: Network + ?Sized>(net: &mut N, node: NodeId) -> usize {
    RefWalk::new().deref(net, node)
}

/// Reference every fanin of `node`, recursing into fanins that were dead.
pub fn ref_node<N: Network + ?Sized>(net: &mut N, node: NodeId) -> usize {
    RefWalk::new().reference(net, node)
}

fn balanced_size<N: Network + ?Sized>(net: &mut N, node: NodeId, walk: RefWalk) -> usize {
    if net.is_leaf(node) || net.fanin_count(node) == 0 {
        return 0;
    }
    let deref_size = walk.deref(net, node);
    let ref_size = walk.label(false).reference(net, node);
    assert_eq!(deref_size, ref_size, "unbalanced fanout counts below {}", node);
    assert!(deref_size > 0);
    trace!("mffc of {}: {} nodes ({:?})", node, deref_size, walk.policy);
    deref_size
}

/// Returns the size of the MFFC of `node`, leaving the counts untouched.
///
/// Leaves and nodes without fanins have no cone and return 0.
///
/// # Panics
///
/// Panics if the fanout counts below `node` are inconsistent.
pub fn mffc_size<N: Network + ?Sized>(net: &mut N, node: NodeId) -> usize {
    balanced_size(net, node, RefWalk::new())
}

/// Returns the size of the MFFC of `node` without crossing complemented edges.
///
/// # Panics
///
/// Panics if the fanout counts below `node` are inconsistent.
pub fn mffc_size_stop<N: Network + ?Sized>(net: &mut N, node: NodeId) -> usize {
    balanced_size(net, node, RefWalk::new().policy(EdgePolicy::StopAtComplement))
}

/// Returns the size of the MFFC of `node` and stamps its nodes with the current traversal generation.
///
/// Leaves below the cone are not stamped. The generation is not advanced: call
/// [`Network::increment_trav_id`] first for a fresh labelling, or label several
/// cones under one generation to mark their union.
///
/// # Panics
///
/// Panics if the fanout counts below `node` are inconsistent.
pub fn mffc_label_aig<N: Network + ?Sized>(net: &mut N, node: NodeId) -> usize {
    balanced_size(net, node, RefWalk::new().label(true))
}

/// Returns the size of the MFFC of `node` using the policy and traversal of `config`.
///
/// # Panics
///
/// Panics if the fanout counts below `node` are inconsistent.
pub fn mffc_size_with<N: Network + ?Sized>(net: &mut N, node: NodeId, config: &MffcConfig) -> usize {
    balanced_size(net, node, config.walk())
}
