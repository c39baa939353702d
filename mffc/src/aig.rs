//! A vector-backed and-inverter graph.
//!
//! Nodes live in an arena indexed by [`NodeId`]; index 0 is the constant zero
//! node. When loaded from AIGER, a node's index is its AIGER variable.
//! Every edge held by an AND gate, a latch next-state or a primary output
//! counts as one live parent of the node it points at.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use itertools::Itertools;
use log::debug;

use crate::error::{Error, Result};
use crate::fanout::FanoutCounts;
use crate::node::{Edge, NodeId, NodeKind};
use crate::traits::Network;
use crate::trav::TravIds;

/// An and-inverter graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AigNode {
    /// The constant zero. An internal node with no fanins.
    Const,
    /// A primary input, by position.
    Input(usize),
    /// The current-state output of a latch, by position.
    Latch(usize),
    /// A two-input AND gate.
    And(Edge, Edge),
}

impl AigNode {
    /// Combinational inputs are leaves; everything else is internal.
    #[must_use]
    pub const fn kind(self) -> NodeKind {
        match self {
            Self::Input(_) | Self::Latch(_) => NodeKind::Leaf,
            Self::Const | Self::And(..) => NodeKind::Internal,
        }
    }

    /// Returns true if this is an AND gate.
    #[must_use]
    pub const fn is_and(self) -> bool {
        matches!(self, Self::And(..))
    }
}

/// A latch, seen combinationally: its output is a leaf, its next-state edge a consumer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Latch {
    /// The latch output node.
    pub node: NodeId,
    /// The next-state function.
    pub next: Edge,
}

/// An and-inverter graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Aig {
    nodes: Vec<AigNode>,
    inputs: Vec<NodeId>,
    latches: Vec<Latch>,
    outputs: Vec<Edge>,
    names: HashMap<NodeId, String>,
    output_names: HashMap<usize, String>,
    fanouts: FanoutCounts,
    trav: TravIds,
}

impl Default for Aig {
    fn default() -> Self {
        Self::new()
    }
}

impl Aig {
    /// Create an and-inverter graph holding only the constant node.
    #[must_use]
    pub fn new() -> Self {
        let mut aig = Self {
            nodes: Vec::new(),
            inputs: Vec::new(),
            latches: Vec::new(),
            outputs: Vec::new(),
            names: HashMap::new(),
            output_names: HashMap::new(),
            fanouts: FanoutCounts::new(),
            trav: TravIds::new(),
        };
        aig.push_node(AigNode::Const);
        aig
    }

    /// The constant zero edge. Its complement is constant one.
    #[must_use]
    pub fn const0() -> Edge {
        Edge::new(NodeId::new(0), false)
    }

    fn push_node(&mut self, node: AigNode) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        self.fanouts.resize(self.nodes.len());
        self.trav.resize(self.nodes.len());
        id
    }

    /// Append a primary input.
    pub fn push_input(&mut self) -> Edge {
        let node = self.push_node(AigNode::Input(self.inputs.len()));
        self.inputs.push(node);
        node.into()
    }

    /// Append a latch, with constant zero as its next state until [`Aig::set_latch_next`].
    pub fn push_latch(&mut self) -> Edge {
        let node = self.push_node(AigNode::Latch(self.latches.len()));
        let next = Self::const0();
        self.fanouts.increment(next.node());
        self.latches.push(Latch { node, next });
        node.into()
    }

    /// Point latch `index` at a new next-state function.
    ///
    /// # Panics
    ///
    /// Panics if there is no latch `index`.
    pub fn set_latch_next(&mut self, index: usize, next: Edge) {
        self.fanouts.increment(next.node());
        let old = std::mem::replace(&mut self.latches[index].next, next);
        self.fanouts.decrement(old.node());
    }

    /// Append the AND of two edges. No structural hashing is done.
    pub fn push_and(&mut self, fanin0: Edge, fanin1: Edge) -> Edge {
        self.fanouts.increment(fanin0.node());
        self.fanouts.increment(fanin1.node());
        self.push_node(AigNode::And(fanin0, fanin1)).into()
    }

    /// Append a primary output driven by `edge`, returning its position.
    pub fn push_output(&mut self, edge: Edge) -> usize {
        self.fanouts.increment(edge.node());
        self.outputs.push(edge);
        self.outputs.len() - 1
    }

    /// Returns a node.
    #[must_use]
    pub fn node(&self, node: NodeId) -> AigNode {
        self.nodes[node.index()]
    }

    /// Number of AND gates.
    #[must_use]
    pub fn and_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_and()).count()
    }

    /// Iterate over the AND gates in index order.
    pub fn iter_ands(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .positions(|node| node.is_and())
            .map(NodeId::new)
    }

    /// Primary inputs, in order.
    #[must_use]
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Latches, in order.
    #[must_use]
    pub fn latches(&self) -> &[Latch] {
        &self.latches
    }

    /// Primary outputs, in order.
    #[must_use]
    pub fn outputs(&self) -> &[Edge] {
        &self.outputs
    }

    /// Returns the symbol of an input or latch node, if it has one.
    #[must_use]
    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.names.get(&node).map(String::as_str)
    }

    /// Name an input or latch node.
    pub fn set_name(&mut self, node: NodeId, name: impl Into<String>) {
        self.names.insert(node, name.into());
    }

    /// Returns the symbol of output `index`, if it has one.
    #[must_use]
    pub fn output_name(&self, index: usize) -> Option<&str> {
        self.output_names.get(&index).map(String::as_str)
    }

    /// Recount every node's parents and compare against the stored fanout counts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FanoutMismatch`] for the first node whose count is off.
    pub fn check_fanouts(&self) -> Result<()> {
        let mut expected = vec![0_u32; self.nodes.len()];
        for node in &self.nodes {
            if let AigNode::And(fanin0, fanin1) = node {
                expected[fanin0.node().index()] += 1;
                expected[fanin1.node().index()] += 1;
            }
        }
        for edge in self.latches.iter().map(|latch| latch.next).chain(self.outputs.iter().copied()) {
            expected[edge.node().index()] += 1;
        }

        for (index, (&expected, &found)) in expected.iter().zip_eq(self.fanouts.as_slice()).enumerate() {
            if expected != found {
                return Err(Error::FanoutMismatch {
                    node: NodeId::new(index),
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }

    fn check_acyclic(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Fresh,
            Open,
            Done,
        }

        let mut marks = vec![Mark::Fresh; self.nodes.len()];
        for start in 0..self.nodes.len() {
            if marks[start] != Mark::Fresh {
                continue;
            }
            marks[start] = Mark::Open;
            let mut stack = vec![(NodeId::new(start), 0)];
            while let Some(frame) = stack.last_mut() {
                let (node, next) = *frame;
                if next < self.fanin_count(node) {
                    frame.1 += 1;
                    let fanin = self.fanin(node, next).node();
                    match marks[fanin.index()] {
                        Mark::Open => return Err(Error::Cycle(fanin.index())),
                        Mark::Fresh => {
                            marks[fanin.index()] = Mark::Open;
                            stack.push((fanin, 0));
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[node.index()] = Mark::Done;
                    stack.pop();
                }
            }
        }
        Ok(())
    }

    /// Read an ASCII AIGER file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not a well-formed combinational network.
    pub fn from_aiger_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_aiger(file)
    }

    /// Read an ASCII AIGER network.
    ///
    /// Latch outputs become leaves and their next-state edges consumers, so the
    /// result is the combinational view of a sequential network.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader rejects the input, or a variable is
    /// out of range, redefined, undefined or part of a cycle.
    pub fn from_aiger(input: impl Read) -> Result<Self> {
        let reader = aiger::Reader::from_reader(input).map_err(Error::aiger)?;
        let max = reader.header().m;

        let variable = |literal: aiger::Literal| {
            let var = literal.variable();
            if var > max {
                Err(Error::OutOfRange { var, max })
            } else {
                Ok(var)
            }
        };
        let edge = |literal: aiger::Literal| -> Result<Edge> {
            Ok(Edge::new(NodeId::new(variable(literal)?), literal.is_inverted()))
        };

        let mut slots: Vec<Option<AigNode>> = vec![None; max + 1];
        slots[0] = Some(AigNode::Const);
        let mut inputs = Vec::new();
        let mut latches = Vec::new();
        let mut outputs = Vec::new();
        let mut symbols = Vec::new();

        for record in reader.records() {
            match record.map_err(Error::aiger)? {
                aiger::Aiger::Input(literal) => {
                    let var = variable(literal)?;
                    define(&mut slots, var, AigNode::Input(inputs.len()))?;
                    inputs.push(NodeId::new(var));
                }
                aiger::Aiger::Latch { output, input } => {
                    let var = variable(output)?;
                    define(&mut slots, var, AigNode::Latch(latches.len()))?;
                    latches.push(Latch {
                        node: NodeId::new(var),
                        next: edge(input)?,
                    });
                }
                aiger::Aiger::Output(literal) => outputs.push(edge(literal)?),
                aiger::Aiger::AndGate { output, inputs: fanins } => {
                    let gate = AigNode::And(edge(fanins[0])?, edge(fanins[1])?);
                    define(&mut slots, variable(output)?, gate)?;
                }
                aiger::Aiger::Symbol { type_spec, position, symbol } => {
                    symbols.push((type_spec, position, symbol));
                }
            }
        }

        let nodes = slots
            .into_iter()
            .enumerate()
            .map(|(var, slot)| slot.ok_or(Error::Undefined(var)))
            .collect::<Result<Vec<_>>>()?;

        let mut aig = Self {
            nodes,
            inputs,
            latches,
            outputs,
            names: HashMap::new(),
            output_names: HashMap::new(),
            fanouts: FanoutCounts::new(),
            trav: TravIds::new(),
        };
        aig.fanouts.resize(aig.nodes.len());
        aig.trav.resize(aig.nodes.len());
        aig.check_acyclic()?;

        for node in &aig.nodes {
            if let AigNode::And(fanin0, fanin1) = node {
                aig.fanouts.increment(fanin0.node());
                aig.fanouts.increment(fanin1.node());
            }
        }
        for latch in &aig.latches {
            aig.fanouts.increment(latch.next.node());
        }
        for output in &aig.outputs {
            aig.fanouts.increment(output.node());
        }

        for (type_spec, position, symbol) in symbols {
            let node = match type_spec {
                aiger::Symbol::Input => aig.inputs.get(position).copied(),
                aiger::Symbol::Latch => aig.latches.get(position).map(|latch| latch.node),
                aiger::Symbol::Output => {
                    aig.output_names.insert(position, symbol);
                    continue;
                }
            };
            if let Some(node) = node {
                aig.names.insert(node, symbol);
            }
        }

        debug!(
            "loaded AIGER: {} inputs, {} latches, {} outputs, {} ands",
            aig.inputs.len(),
            aig.latches.len(),
            aig.outputs.len(),
            aig.and_count()
        );
        Ok(aig)
    }
}

fn define(slots: &mut [Option<AigNode>], var: usize, node: AigNode) -> Result<()> {
    if slots[var].is_some() {
        return Err(Error::Redefined(var));
    }
    slots[var] = Some(node);
    Ok(())
}

impl Network for Aig {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        self.nodes[node.index()].kind()
    }

    fn fanin_count(&self, node: NodeId) -> usize {
        match self.nodes[node.index()] {
            AigNode::And(..) => 2,
            AigNode::Const | AigNode::Input(_) | AigNode::Latch(_) => 0,
        }
    }

    fn fanin(&self, node: NodeId, index: usize) -> Edge {
        match (self.nodes[node.index()], index) {
            (AigNode::And(fanin0, _), 0) => fanin0,
            (AigNode::And(_, fanin1), 1) => fanin1,
            _ => panic!("{} has no fanin {}", node, index),
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
