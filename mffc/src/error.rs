use thiserror::Error;

use crate::node::NodeId;

/// Errors raised while building or checking a network.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the input failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The AIGER reader rejected the input.
    #[error("malformed AIGER input: {0}")]
    Aiger(String),
    /// A literal names a variable above the header maximum.
    #[error("variable {var} exceeds the declared maximum {max}")]
    OutOfRange {
        /// The offending variable.
        var: usize,
        /// The header maximum.
        max: usize,
    },
    /// A variable is defined twice.
    #[error("variable {0} is defined more than once")]
    Redefined(usize),
    /// A variable is never defined.
    #[error("variable {0} is never defined")]
    Undefined(usize),
    /// An AND gate depends on itself.
    #[error("variable {0} lies on a combinational cycle")]
    Cycle(usize),
    /// A stored fanout count disagrees with the structure.
    #[error("{node} has fanout count {found}, but {expected} parents")]
    FanoutMismatch {
        /// The node with the wrong count.
        node: NodeId,
        /// Parents found by scanning the network.
        expected: u32,
        /// Count stored for the node.
        found: u32,
    },
}

impl Error {
    pub(crate) fn aiger(err: impl std::fmt::Debug) -> Self {
        Self::Aiger(format!("{:?}", err))
    }
}

/// A result carrying [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
