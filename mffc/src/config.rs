use crate::refs::{EdgePolicy, RefWalk, Traversal};

/// Settings for MFFC queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MffcConfig {
    /// Which fanin edges are counted while dereferencing.
    pub policy: EdgePolicy,
    /// Recursion or explicit stack.
    pub traversal: Traversal,
    /// Largest number of cone nodes to collect, if any.
    pub cut_limit: Option<usize>,
}

impl MffcConfig {
    /// All edges, recursive, no cut limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            policy: EdgePolicy::All,
            traversal: Traversal::Recursive,
            cut_limit: None,
        }
    }

    /// Count only the edges admitted by `policy`.
    #[must_use]
    pub const fn with_policy(mut self, policy: EdgePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Walk with `traversal`.
    #[must_use]
    pub const fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Stop collecting once `limit` cone nodes are taken.
    #[must_use]
    pub const fn with_cut_limit(mut self, limit: usize) -> Self {
        self.cut_limit = Some(limit);
        self
    }

    pub(crate) const fn walk(&self) -> RefWalk {
        RefWalk::new().policy(self.policy).traversal(self.traversal)
    }
}
