#![forbid(unsafe_code)]

//! Focusable-node identity and registry entries.

/// Unique identifier for a focusable element on a surface.
///
/// Identities are assigned by the embedder (widget ids, DOM-ish handles);
/// the a11y layer only compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One focusable element as the registry tracks it.
///
/// `owner` models one level of containment: which host element the node
/// lives inside. That is all a focus trap needs to scope itself to a
/// subtree; full tree geometry stays out of this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusNode {
    pub id: NodeId,
    pub owner: Option<NodeId>,
    pub focusable: bool,
}

impl FocusNode {
    /// Create a focusable, unowned node.
    #[must_use]
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            owner: None,
            focusable: true,
        }
    }

    /// Set the host element this node lives inside.
    #[must_use]
    pub fn owned_by(mut self, owner: NodeId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Set whether the node can receive focus.
    #[must_use]
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_builder_defaults() {
        let node = FocusNode::new(NodeId::new(7));
        assert_eq!(node.id, NodeId::new(7));
        assert_eq!(node.owner, None);
        assert!(node.focusable);
    }

    #[test]
    fn node_builder_chains() {
        let node = FocusNode::new(NodeId::new(2))
            .owned_by(NodeId::new(1))
            .focusable(false);
        assert_eq!(node.owner, Some(NodeId::new(1)));
        assert!(!node.focusable);
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId::new(42).to_string(), "#42");
        assert_eq!(NodeId::new(42).id(), 42);
    }
}
