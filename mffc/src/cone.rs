//! Cone and support collection over a dereferenced node.
//!
//! After [`deref_node`](crate::refs::deref_node) the fanout counts describe the network with the root
//! removed: every node of its MFFC has a count of zero, and every node the cone
//! reads from the outside still has a positive count. Collection walks down
//! from the root and splits what it reaches into the cone (collected in
//! post-order, root last) and its support (the boundary it stops at).
//! Collection never touches the counts.

use log::trace;

use crate::config::MffcConfig;
use crate::node::NodeId;
use crate::refs::{RefWalk, Traversal};
use crate::traits::Network;

/// The nodes of an MFFC and the boundary feeding it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConeSupport {
    /// Internal nodes of the cone, every node after the cone nodes it reads from. The root comes last.
    pub cone: Vec<NodeId>,
    /// Leaves, and internal nodes still used outside the cone, in discovery order.
    pub support: Vec<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Boundary {
    /// Stamp and record boundary nodes.
    Record,
    /// Leave boundary nodes unstamped.
    Skip,
}

struct Collector {
    boundary: Boundary,
    limit: usize,
    expanded: usize,
    found: ConeSupport,
}

impl Collector {
    fn new(boundary: Boundary, cut_limit: Option<usize>) -> Self {
        Self {
            boundary,
            limit: cut_limit.unwrap_or(usize::MAX),
            expanded: 0,
            found: ConeSupport::default(),
        }
    }

    /// Returns true when `node` is to be expanded as a cone node.
    fn enter<N: Network + ?Sized>(&mut self, net: &mut N, node: NodeId, topmost: bool) -> bool {
        if net.is_trav_id_current(node) {
            return false;
        }
        if !topmost && (net.is_leaf(node) || net.fanout_count(node) > 0) {
            if self.boundary == Boundary::Record {
                net.set_trav_id_current(node);
                self.found.support.push(node);
            }
            return false;
        }
        // Past the cut, nodes stay unvisited and are not promoted to support.
        if self.expanded >= self.limit {
            return false;
        }
        net.set_trav_id_current(node);
        self.expanded += 1;
        true
    }

    fn visit_rec<N: Network + ?Sized>(&mut self, net: &mut N, node: NodeId, topmost: bool) {
        if !self.enter(net, node, topmost) {
            return;
        }
        for index in 0..net.fanin_count(node) {
            let fanin = net.fanin(node, index).node();
            self.visit_rec(net, fanin, false);
        }
        self.found.cone.push(node);
    }

    fn visit_iter<N: Network + ?Sized>(&mut self, net: &mut N, root: NodeId) {
        if !self.enter(net, root, true) {
            return;
        }
        let mut stack = vec![(root, 0)];
        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            if next < net.fanin_count(node) {
                frame.1 += 1;
                let fanin = net.fanin(node, next).node();
                if self.enter(net, fanin, false) {
                    stack.push((fanin, 0));
                }
            } else {
                stack.pop();
                self.found.cone.push(node);
            }
        }
    }

    fn run<N: Network + ?Sized>(mut self, net: &mut N, root: NodeId, traversal: Traversal) -> ConeSupport {
        net.increment_trav_id();
        match traversal {
            Traversal::Recursive => self.visit_rec(net, root, true),
            Traversal::Iterative => self.visit_iter(net, root),
        }
        self.found
    }
}

/// Collect the cone and support of a dereferenced `root`.
///
/// `cut_limit` caps the number of cone nodes. Once the cap is reached, the
/// fanins of nodes still being expanded are left unvisited: they appear in
/// neither the cone nor the support. The node the cut falls on is not stamped
/// either, so a later walk in the same generation can still reach it.
///
/// A leaf has no cone; the result is empty.
pub fn collect_cone_support<N: Network + ?Sized>(
    net: &mut N,
    root: NodeId,
    cut_limit: Option<usize>,
    traversal: Traversal,
) -> ConeSupport {
    if net.is_leaf(root) {
        return ConeSupport::default();
    }
    Collector::new(Boundary::Record, cut_limit).run(net, root, traversal)
}

/// Collect the cone and support of a dereferenced `root`.
///
/// The caller dereferences `root` beforehand and references it afterwards.
pub fn cone_and_support<N: Network + ?Sized>(net: &mut N, root: NodeId) -> ConeSupport {
    collect_cone_support(net, root, None, Traversal::Recursive)
}

/// Collect at most `limit` cone nodes of a dereferenced `root`, and the support met on the way.
///
/// The support is not completed past the cut; see [`collect_cone_support`].
pub fn cone_and_support_with_cut<N: Network + ?Sized>(net: &mut N, root: NodeId, limit: usize) -> ConeSupport {
    collect_cone_support(net, root, Some(limit), Traversal::Recursive)
}

/// Dereference `root`, collect its cone and support under `config`, and reference it back.
///
/// # Panics
///
/// Panics if the fanout counts below `root` are inconsistent.
pub fn mffc<N: Network + ?Sized>(net: &mut N, root: NodeId, config: &MffcConfig) -> ConeSupport {
    if net.is_leaf(root) || net.fanin_count(root) == 0 {
        return ConeSupport::default();
    }
    let walk = config.walk();
    let deref_size = walk.deref(net, root);
    let found = collect_cone_support(net, root, config.cut_limit, config.traversal);
    let ref_size = walk.reference(net, root);
    assert_eq!(deref_size, ref_size, "unbalanced fanout counts below {}", root);
    trace!("mffc of {}: cone {}, support {}", root, found.cone.len(), found.support.len());
    found
}

/// Collect the cone of `root` as if every node of `leaves` had one more consumer.
///
/// The protected nodes never join the cone. Counts are restored on return.
///
/// # Panics
///
/// Panics if the fanout counts below `root` are inconsistent.
pub fn mffc_inside<N: Network + ?Sized>(
    net: &mut N,
    root: NodeId,
    leaves: &[NodeId],
    traversal: Traversal,
) -> Vec<NodeId> {
    if net.is_leaf(root) {
        return Vec::new();
    }
    for &leaf in leaves {
        net.fanouts_mut().increment(leaf);
    }
    let walk = RefWalk::new().traversal(traversal);
    let deref_size = walk.deref(net, root);
    let found = Collector::new(Boundary::Record, None).run(net, root, traversal);
    let ref_size = walk.reference(net, root);
    assert_eq!(deref_size, ref_size, "unbalanced fanout counts below {}", root);
    for &leaf in leaves {
        net.fanouts_mut().decrement(leaf);
    }
    found.cone
}

/// Collect the cone of `root`, restoring counts on return.
///
/// # Panics
///
/// Panics if the fanout counts below `root` are inconsistent.
pub fn mffc_inside_collect<N: Network + ?Sized>(net: &mut N, root: NodeId, traversal: Traversal) -> Vec<NodeId> {
    mffc_inside(net, root, &[], traversal)
}

/// Stamp the cone of `root` with a fresh traversal generation and return its size.
///
/// Unlike [`cone_and_support`], the boundary is left unstamped, so afterwards
/// [`Network::is_trav_id_current`] holds for exactly the cone nodes. When
/// `nodes` is given, the cone is appended to it in post-order.
///
/// # Panics
///
/// Panics if the fanout counts below `root` are inconsistent.
pub fn mffc_label<N: Network + ?Sized>(
    net: &mut N,
    root: NodeId,
    nodes: Option<&mut Vec<NodeId>>,
    traversal: Traversal,
) -> usize {
    if net.is_leaf(root) {
        return 0;
    }
    let walk = RefWalk::new().traversal(traversal);
    let deref_size = walk.deref(net, root);
    let found = Collector::new(Boundary::Skip, None).run(net, root, traversal);
    let ref_size = walk.reference(net, root);
    assert_eq!(deref_size, ref_size, "unbalanced fanout counts below {}", root);
    if let Some(nodes) = nodes {
        nodes.extend(found.cone);
    }
    deref_size
}

#[cfg(test)]
mod tests {
    use super::{
        collect_cone_support, cone_and_support, cone_and_support_with_cut, mffc, mffc_inside, mffc_inside_collect,
        mffc_label, ConeSupport,
    };
    use crate::aig::Aig;
    use crate::config::MffcConfig;
    use crate::node::{Edge, NodeId};
    use crate::refs::{deref_node, ref_node, Traversal};
    use crate::traits::Network;

    /// `root = (l1 & l2) & (l2 & l3)`, with `l2` also driving an output.
    fn shared_leaf_tree() -> (Aig, [NodeId; 6]) {
        let mut aig = Aig::new();
        let l1 = aig.push_input();
        let l2 = aig.push_input();
        let l3 = aig.push_input();
        let a = aig.push_and(l1, l2);
        let b = aig.push_and(l2, l3);
        let root = aig.push_and(a, b);
        aig.push_output(root);
        aig.push_output(l2);
        (aig, [l1, l2, l3, a, b, root].map(Edge::node))
    }

    #[test]
    fn cone_and_support_of_shared_leaf_tree() {
        let (mut aig, [l1, l2, l3, a, b, root]) = shared_leaf_tree();
        let before = aig.fanouts().clone();

        assert_eq!(deref_node(&mut aig, root), 3);
        let found = cone_and_support(&mut aig, root);
        assert_eq!(ref_node(&mut aig, root), 3);

        assert_eq!(found.cone, vec![a, b, root]);
        assert_eq!(found.support, vec![l1, l2, l3]);
        assert_eq!(&before, aig.fanouts());
    }

    /// `root = a & b`, `a = x & y`, `b = a & z`.
    fn reconvergent() -> (Aig, [NodeId; 6]) {
        let mut aig = Aig::new();
        let x = aig.push_input();
        let y = aig.push_input();
        let z = aig.push_input();
        let a = aig.push_and(x, y);
        let b = aig.push_and(a, z);
        let root = aig.push_and(a, b);
        aig.push_output(root);
        (aig, [x, y, z, a, b, root].map(Edge::node))
    }

    #[test]
    fn reconvergent_node_used_only_inside_is_cone() {
        let (mut aig, [x, y, z, a, b, root]) = reconvergent();

        let found = mffc(&mut aig, root, &MffcConfig::new());
        assert_eq!(found.cone, vec![a, b, root]);
        assert_eq!(found.support, vec![x, y, z]);
    }

    #[test]
    fn internal_node_with_outside_consumer_is_support() {
        let (mut aig, [_, _, _, a, b, root]) = reconvergent();
        aig.push_output(Edge::from(b));

        // `b` is kept alive by the output, and keeps `a` alive in turn.
        let found = mffc(&mut aig, root, &MffcConfig::new());
        assert_eq!(found.cone, vec![root]);
        assert_eq!(found.support, vec![a, b]);
    }

    #[test]
    fn partition_covers_reachable_nodes() {
        let (mut aig, [l1, l2, l3, a, b, root]) = shared_leaf_tree();
        let ConeSupport { cone, support } = mffc(&mut aig, root, &MffcConfig::new());

        for node in [l1, l2, l3, a, b, root] {
            let places = usize::from(cone.contains(&node)) + usize::from(support.contains(&node));
            assert_eq!(places, 1, "{} is in {} places", node, places);
        }
    }

    #[test]
    fn requery_is_idempotent() {
        let (mut aig, [.., root]) = shared_leaf_tree();

        deref_node(&mut aig, root);
        let first = cone_and_support(&mut aig, root);
        let second = cone_and_support(&mut aig, root);
        ref_node(&mut aig, root);

        assert_eq!(first, second);
    }

    #[test]
    fn cut_limit_truncates_without_backfilling_support() {
        let (mut aig, [l1, l2, _, _, _, root]) = shared_leaf_tree();

        deref_node(&mut aig, root);
        let found = cone_and_support_with_cut(&mut aig, root, 1);
        ref_node(&mut aig, root);

        // Only the root is expanded; its fanins are left out of both lists.
        assert_eq!(found.cone, vec![root]);
        assert!(found.support.is_empty());
        assert!(!found.support.contains(&l1) && !found.support.contains(&l2));
    }

    #[test]
    fn cut_limit_keeps_support_met_before_the_cut() {
        let (mut aig, [l1, l2, l3, a, b, root]) = shared_leaf_tree();

        deref_node(&mut aig, root);
        let found = cone_and_support_with_cut(&mut aig, root, 2);
        ref_node(&mut aig, root);

        // `a` takes the second slot, `b` is cut off along with `l3`.
        assert_eq!(found.cone, vec![a, root]);
        assert_eq!(found.support, vec![l1, l2]);
        assert!(!found.cone.contains(&b));
        assert!(!found.support.contains(&l3));
        assert!(!aig.is_trav_id_current(b));
    }

    #[test]
    fn cut_limit_zero_collects_nothing() {
        let (mut aig, [.., root]) = shared_leaf_tree();

        deref_node(&mut aig, root);
        let found = cone_and_support_with_cut(&mut aig, root, 0);
        ref_node(&mut aig, root);

        assert_eq!(found, ConeSupport::default());
    }

    #[test]
    fn cut_limit_above_cone_size_changes_nothing() {
        let (mut aig, [.., root]) = shared_leaf_tree();

        let full = mffc(&mut aig, root, &MffcConfig::new());
        let cut = mffc(&mut aig, root, &MffcConfig::new().with_cut_limit(16));
        assert_eq!(full, cut);
    }

    #[test]
    fn iterative_collection_matches_recursive() {
        let (mut aig, [.., root]) = shared_leaf_tree();

        deref_node(&mut aig, root);
        for limit in [None, Some(0), Some(1), Some(2), Some(3)] {
            let recursive = collect_cone_support(&mut aig, root, limit, Traversal::Recursive);
            let iterative = collect_cone_support(&mut aig, root, limit, Traversal::Iterative);
            assert_eq!(recursive, iterative, "cut limit {:?}", limit);
        }
        ref_node(&mut aig, root);
    }

    #[test]
    fn leaf_root_has_empty_cone() {
        let (mut aig, [l1, ..]) = shared_leaf_tree();

        assert_eq!(cone_and_support(&mut aig, l1), ConeSupport::default());
        assert_eq!(mffc(&mut aig, l1, &MffcConfig::new()), ConeSupport::default());
        assert!(mffc_inside_collect(&mut aig, l1, Traversal::Recursive).is_empty());
        assert_eq!(mffc_label(&mut aig, l1, None, Traversal::Iterative), 0);
    }

    #[test]
    fn protected_leaves_stay_out_of_the_cone() {
        let (mut aig, [_, _, _, a, b, root]) = shared_leaf_tree();
        let before = aig.fanouts().clone();

        for traversal in [Traversal::Recursive, Traversal::Iterative] {
            assert_eq!(mffc_inside_collect(&mut aig, root, traversal), vec![a, b, root]);
            assert_eq!(mffc_inside(&mut aig, root, &[a], traversal), vec![b, root]);
            assert_eq!(mffc_inside(&mut aig, root, &[a, b], traversal), vec![root]);
            assert_eq!(&before, aig.fanouts());
        }
    }

    #[test]
    fn label_marks_cone_only() {
        let (mut aig, [l1, l2, l3, a, b, root]) = shared_leaf_tree();
        for traversal in [Traversal::Recursive, Traversal::Iterative] {
            let mut nodes = Vec::new();

            assert_eq!(mffc_label(&mut aig, root, Some(&mut nodes), traversal), 3);
            assert_eq!(nodes, vec![a, b, root]);
            for node in [a, b, root] {
                assert!(aig.is_trav_id_current(node));
            }
            for node in [l1, l2, l3] {
                assert!(!aig.is_trav_id_current(node));
            }
        }
    }
}
