//! Node identifiers with an explicit Root tag.

use core::fmt;

/// Conventional sentinel used to mark the Root in string-keyed graphs.
///
/// Only constructors that read plain label graphs look at this value; once a
/// [`Hierarchy`](super::Hierarchy) exists the Root is [`Node::Root`].
pub const ROOT: &str = "<ROOT>";

/// A node in a class hierarchy.
///
/// The Root is synthetic: it carries no label and never gets a column in a
/// label matrix. Every real category is a `Label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node<L> {
    /// The synthetic top-level node.
    Root,
    /// A real category.
    Label(L),
}

impl<L> Node<L> {
    /// Check if this is the Root.
    pub fn is_root(&self) -> bool {
        matches!(self, Node::Root)
    }

    /// Get the label, or `None` for the Root.
    pub fn as_label(&self) -> Option<&L> {
        match self {
            Node::Root => None,
            Node::Label(label) => Some(label),
        }
    }

    /// Map the label, keeping the Root tag.
    pub fn map<M>(self, f: impl FnOnce(L) -> M) -> Node<M> {
        match self {
            Node::Root => Node::Root,
            Node::Label(label) => Node::Label(f(label)),
        }
    }

    /// Treat `value` as the Root when it equals `sentinel`.
    pub fn from_sentinel(value: L, sentinel: &L) -> Self
    where
        L: PartialEq,
    {
        if &value == sentinel {
            Node::Root
        } else {
            Node::Label(value)
        }
    }
}

impl<L> From<L> for Node<L> {
    fn from(label: L) -> Self {
        Node::Label(label)
    }
}

impl<L: fmt::Display> fmt::Display for Node<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Root => write!(f, "{ROOT}"),
            Node::Label(label) => write!(f, "{label}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_maps_to_root() {
        let root = Node::from_sentinel(ROOT.to_string(), &ROOT.to_string());
        assert!(root.is_root());

        let a = Node::from_sentinel("a".to_string(), &ROOT.to_string());
        assert_eq!(a.as_label().map(String::as_str), Some("a"));
    }

    #[test]
    fn map_preserves_root() {
        assert_eq!(Node::<&str>::Root.map(str::len), Node::Root);
        assert_eq!(Node::Label("abc").map(str::len), Node::Label(3));
        assert_eq!(Node::<u8>::Root.to_string(), "<ROOT>");
    }
}
