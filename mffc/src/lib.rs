//! Maximum fanout-free cones over reference-counted and-inverter graphs.
//!
//! An and-inverter graph (AIG) represents boolean logic as two-input AND gates whose input edges may be inverted.
//! Primary inputs and latch outputs are the leaves of the graph; everything else is computed from them.
//!
//! Every node keeps a fanout count: the number of live consumers of its output, where a consumer is either another
//! AND gate or a primary output. The maximum fanout-free cone (MFFC) of a node `n` is the largest set of nodes that
//! would become dead if `n` were removed. It contains `n` itself and every internal node whose consumers all lie
//! inside the cone.
//!
//! The MFFC is found without building any side structure. Dereferencing `n` decrements the counts of its fanins, and
//! every fanin whose count reaches zero belongs to the cone and is dereferenced in turn. Referencing `n` again runs
//! the same walk with increments and restores every count exactly. The number of nodes touched on the way down is the
//! size of the cone, and the walk back up has to touch the same number of nodes, which is checked on every query.
//!
//! While the cone is dereferenced its members have count zero, so a second walk can list them (the cone) and the
//! nodes where the walk stops (the support). A traversal generation number on every node makes "visited in this
//! walk" an O(1) check without clearing anything between walks.
//!
//! The walks only need the [`traits::Network`] view of a graph. Two networks implement it: [`aig::Aig`], a compact
//! arena loaded from AIGER files, and [`graph::GraphAig`], a petgraph graph with stable indices that can delete
//! dead logic.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod aig;
pub mod cone;
pub mod config;
pub mod error;
pub mod fanout;
pub mod graph;
pub mod node;
pub mod refs;
pub mod traits;
pub mod trav;

pub use aig::Aig;
pub use cone::{cone_and_support, mffc, ConeSupport};
pub use config::MffcConfig;
pub use error::{Error, Result};
pub use graph::GraphAig;
pub use node::{Edge, NodeId, NodeKind};
pub use refs::{mffc_size, EdgePolicy, Traversal};
pub use traits::Network;
