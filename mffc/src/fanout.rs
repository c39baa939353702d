use crate::node::NodeId;

/// Live-parent counters, one per node.
///
/// Counts only move through balanced increments and decrements. Decrementing a
/// count that is already zero means an earlier walk was unbalanced, so it
/// panics instead of clamping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FanoutCounts(Vec<u32>);

impl FanoutCounts {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of nodes tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no nodes are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Grow the store so that `len` nodes are tracked. New nodes start with no parents.
    pub fn resize(&mut self, len: usize) {
        if len > self.0.len() {
            self.0.resize(len, 0);
        }
    }

    /// Returns the number of live parents of `node`.
    #[must_use]
    pub fn count(&self, node: NodeId) -> u32 {
        self.0[node.index()]
    }

    /// Add a parent to `node`, returning the count before the increment.
    pub fn increment(&mut self, node: NodeId) -> u32 {
        let count = &mut self.0[node.index()];
        let previous = *count;
        *count += 1;
        previous
    }

    /// Remove a parent from `node`, returning the count after the decrement.
    ///
    /// # Panics
    ///
    /// Panics if `node` has no live parents.
    pub fn decrement(&mut self, node: NodeId) -> u32 {
        let count = &mut self.0[node.index()];
        assert!(*count > 0, "fanout count of {} underflowed: dereferenced with no live parents", node);
        *count -= 1;
        *count
    }

    /// All counts, indexed by node.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}
