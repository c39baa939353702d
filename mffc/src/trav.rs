use crate::node::NodeId;

/// Traversal generations: O(1) "visited in this query" marks.
///
/// Instead of clearing a visited flag on every node between queries, each node
/// remembers the generation it was last visited in. Advancing the network-wide
/// generation invalidates every mark at once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TravIds {
    current: u32,
    stamps: Vec<u32>,
}

impl Default for TravIds {
    fn default() -> Self {
        Self::new()
    }
}

impl TravIds {
    /// Create an empty store. Generation 0 is never current, so fresh nodes are unvisited.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: 1,
            stamps: Vec::new(),
        }
    }

    /// Grow the store so that `len` nodes are tracked.
    pub fn resize(&mut self, len: usize) {
        if len > self.stamps.len() {
            self.stamps.resize(len, 0);
        }
    }

    /// The current generation.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Start a new generation, returning it.
    ///
    /// When the counter would wrap, every stamp is cleared and counting restarts.
    pub fn advance(&mut self) -> u32 {
        if self.current == u32::MAX {
            self.stamps.iter_mut().for_each(|stamp| *stamp = 0);
            self.current = 1;
        } else {
            self.current += 1;
        }
        self.current
    }

    /// The generation `node` was last marked in.
    #[must_use]
    pub fn stamp(&self, node: NodeId) -> u32 {
        self.stamps[node.index()]
    }

    /// Returns true if `node` was marked in the current generation.
    #[must_use]
    pub fn is_current(&self, node: NodeId) -> bool {
        self.stamps[node.index()] == self.current
    }

    /// Mark `node` as visited in the current generation.
    pub fn mark(&mut self, node: NodeId) {
        self.stamps[node.index()] = self.current;
    }

    /// Forget any mark on `node`.
    pub fn unmark(&mut self, node: NodeId) {
        self.stamps[node.index()] = 0;
    }
}
