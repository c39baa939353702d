//! An and-inverter graph on top of a petgraph `StableGraph`.
//!
//! Edges run from fanin to consumer and carry their inversion flag as weight.
//! Node indices stay valid when other nodes are removed, so handles taken
//! before a [`GraphAig::sweep`] keep naming the same nodes afterwards.

use std::collections::HashSet;
use std::io::{self, Write};

use log::debug;
use petgraph::prelude::*;

use crate::aig::{Aig, AigNode};
use crate::cone::collect_cone_support;
use crate::fanout::FanoutCounts;
use crate::node::{Edge, NodeId, NodeKind};
use crate::refs::{RefWalk, Traversal};
use crate::traits::Network;
use crate::trav::TravIds;

/// A graph node. AND gates remember their two fanin edges in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphNode {
    /// The constant zero.
    Const,
    /// A combinational input, by position.
    Input(usize),
    /// A two-input AND gate.
    And([EdgeIndex; 2]),
}

/// An and-inverter graph with stable node indices.
#[derive(Clone, Debug)]
pub struct GraphAig {
    graph: StableGraph<GraphNode, bool, Directed>,
    outputs: Vec<Edge>,
    inputs: usize,
    zero: NodeIndex,
    fanouts: FanoutCounts,
    trav: TravIds,
}

impl Default for GraphAig {
    fn default() -> Self {
        Self::new()
    }
}

fn id(index: NodeIndex) -> NodeId {
    NodeId::new(index.index())
}

fn index(node: NodeId) -> NodeIndex {
    NodeIndex::new(node.index())
}

impl GraphAig {
    /// Create a graph holding only the constant node.
    #[must_use]
    pub fn new() -> Self {
        let mut aig = Self {
            graph: StableGraph::new(),
            outputs: Vec::new(),
            inputs: 0,
            zero: NodeIndex::end(),
            fanouts: FanoutCounts::new(),
            trav: TravIds::new(),
        };
        aig.zero = aig.add_node(GraphNode::Const);
        aig
    }

    fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        let index = self.graph.add_node(node);
        // Freed slots are reused; a recycled node starts unvisited.
        self.fanouts.resize(index.index() + 1);
        self.trav.resize(index.index() + 1);
        self.trav.unmark(id(index));
        index
    }

    /// The constant zero edge.
    #[must_use]
    pub fn const0(&self) -> Edge {
        Edge::new(id(self.zero), false)
    }

    /// Add a combinational input.
    pub fn add_input(&mut self) -> Edge {
        let node = self.add_node(GraphNode::Input(self.inputs));
        self.inputs += 1;
        Edge::from(id(node))
    }

    /// Add the AND of two edges.
    pub fn add_and(&mut self, fanin0: Edge, fanin1: Edge) -> Edge {
        let node = self.add_node(GraphNode::And([EdgeIndex::end(); 2]));
        self.connect(node, [fanin0, fanin1]);
        Edge::from(id(node))
    }

    fn connect(&mut self, node: NodeIndex, fanins: [Edge; 2]) {
        let edges = fanins.map(|fanin| {
            self.fanouts.increment(fanin.node());
            self.graph.add_edge(index(fanin.node()), node, fanin.is_complement())
        });
        self.graph[node] = GraphNode::And(edges);
    }

    /// Add an output driven by `edge`, returning its position.
    pub fn add_output(&mut self, edge: Edge) -> usize {
        self.fanouts.increment(edge.node());
        self.outputs.push(edge);
        self.outputs.len() - 1
    }

    /// Outputs, in order.
    #[must_use]
    pub fn outputs(&self) -> &[Edge] {
        &self.outputs
    }

    /// Number of nodes currently in the graph.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.graph.node_count()
    }

    /// The underlying graph.
    #[must_use]
    pub const fn graph(&self) -> &StableGraph<GraphNode, bool> {
        &self.graph
    }

    /// Remove every AND gate nothing consumes, together with its MFFC.
    ///
    /// Returns the number of nodes removed. The constant node is never removed.
    pub fn sweep(&mut self) -> usize {
        let dead = self
            .graph
            .node_indices()
            .filter(|&node| matches!(self.graph[node], GraphNode::And(_)) && self.fanouts.count(id(node)) == 0)
            .collect::<Vec<_>>();

        // Dangling logic can be arbitrarily deep.
        let walk = RefWalk::new().traversal(Traversal::Iterative);
        let mut removed = 0;
        for root in dead {
            // The cone is deleted, so it is never referenced back.
            walk.deref(self, id(root));
            for node in collect_cone_support(self, id(root), None, Traversal::Iterative).cone {
                if index(node) != self.zero {
                    self.graph.remove_node(index(node));
                    removed += 1;
                }
            }
        }
        debug!("swept {} dead nodes, {} remain", removed, self.graph.node_count());
        removed
    }

    /// Write the graph in graphviz format, filling the nodes of `highlight`.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `f`.
    pub fn to_graphviz(&self, mut f: impl Write, highlight: &[NodeId]) -> io::Result<()> {
        let highlight = highlight.iter().copied().collect::<HashSet<_>>();

        writeln!(f, "digraph {{")?;

        for node in self.graph.node_indices() {
            let fill = if highlight.contains(&id(node)) { ",style=filled,fillcolor=orange" } else { "" };
            match self.graph[node] {
                GraphNode::Const => {
                    writeln!(f, "{} [shape=point{}];", node.index(), fill)?;
                }
                GraphNode::Input(position) => {
                    writeln!(f, "{} [shape=box,color=blue,label=\"Input {}\"{}];", node.index(), position, fill)?;
                }
                GraphNode::And(_) => {
                    writeln!(f, "{} [label=\"AND {0}\"{}];", node.index(), fill)?;
                }
            }
        }

        for edge in self.graph.edge_indices() {
            let (from, to) = self.graph.edge_endpoints(edge).expect("edge index from the graph has endpoints");
            writeln!(f, "{} -> {}{};", from.index(), to.index(), inversion(self.graph[edge]))?;
        }

        for (position, output) in self.outputs.iter().enumerate() {
            writeln!(f, "o{} [shape=box,color=green,label=\"Output {0}\"];", position)?;
            writeln!(f, "{} -> o{}{};", output.node().index(), position, inversion(output.is_complement()))?;
        }

        writeln!(f, "}}")
    }
}

const fn inversion(inverted: bool) -> &'static str {
    if inverted {
        " [dir=both,arrowtail=odot]"
    } else {
        ""
    }
}

impl From<&Aig> for GraphAig {
    /// Copy `aig` node for node; every node keeps its index.
    fn from(aig: &Aig) -> Self {
        let mut graph = Self::new();
        for position in 1..aig.node_count() {
            let node = match aig.node(NodeId::new(position)) {
                AigNode::Input(_) | AigNode::Latch(_) => {
                    graph.inputs += 1;
                    GraphNode::Input(graph.inputs - 1)
                }
                AigNode::And(..) => GraphNode::And([EdgeIndex::end(); 2]),
                AigNode::Const => unreachable!("only node 0 is constant"),
            };
            let added = graph.add_node(node);
            debug_assert_eq!(added.index(), position);
        }
        for node in aig.iter_ands() {
            if let AigNode::And(fanin0, fanin1) = aig.node(node) {
                graph.connect(index(node), [fanin0, fanin1]);
            }
        }
        // Latch next-states follow the primary outputs.
        for &output in aig.outputs() {
            graph.add_output(output);
        }
        for latch in aig.latches() {
            graph.add_output(latch.next);
        }
        graph
    }
}

impl Network for GraphAig {
    fn node_count(&self) -> usize {
        self.fanouts.len()
    }

    fn contains(&self, node: NodeId) -> bool {
        self.graph.contains_node(index(node))
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        match self.graph[index(node)] {
            GraphNode::Input(_) => NodeKind::Leaf,
            GraphNode::Const | GraphNode::And(_) => NodeKind::Internal,
        }
    }

    fn fanin_count(&self, node: NodeId) -> usize {
        match self.graph[index(node)] {
            GraphNode::And(_) => 2,
            GraphNode::Const | GraphNode::Input(_) => 0,
        }
    }

    fn fanin(&self, node: NodeId, position: usize) -> Edge {
        match self.graph[index(node)] {
            GraphNode::And(edges) => {
                let edge = edges[position];
                let (source, _) = self.graph.edge_endpoints(edge).expect("fanin edge of a live node exists");
                Edge::new(id(source), self.graph[edge])
            }
            GraphNode::Const | GraphNode::Input(_) => panic!("{} has no fanin {}", node, position),
        }
    }

    fn fanouts(&self) -> &FanoutCounts {
        &self.fanouts
    }

    fn fanouts_mut(&mut self) -> &mut FanoutCounts {
        &mut self.fanouts
    }

    fn trav_ids(&self) -> &TravIds {
        &self.trav
    }

    fn trav_ids_mut(&mut self) -> &mut TravIds {
        &mut self.trav
    }
}
