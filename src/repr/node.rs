//! Tree arena nodes.

use std::ops::Range;

use super::{NodeId, PartitionRule};

/// A node of a [`RandomBinaryTree`](super::RandomBinaryTree) arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Routes a vector to `first` or `second` by `rule`.
    Internal {
        rule: PartitionRule,
        first: NodeId,
        second: NodeId,
    },
    /// Owns `row_index[start..end]`.
    Leaf { start: u32, end: u32, depth: u32 },
}

impl Node {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Range into the tree's row index, or `None` for internal nodes.
    #[inline]
    pub fn leaf_range(&self) -> Option<Range<usize>> {
        match *self {
            Node::Leaf { start, end, .. } => Some(start as usize..end as usize),
            Node::Internal { .. } => None,
        }
    }

    /// Number of rows held by a leaf; 0 for internal nodes.
    #[inline]
    pub fn leaf_len(&self) -> usize {
        self.leaf_range().map_or(0, |r| r.len())
    }
}
