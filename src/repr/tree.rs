//! Random binary tree: an index-addressed node arena over a row permutation.

use fixedbitset::FixedBitSet;

use super::{Branch, Node, NodeId, PartitionRule};

// ============================================================================
// TreeView
// ============================================================================

/// Read access to a partition tree, as needed by traversal.
///
/// The query engine is written against this trait, not against the arena
/// layout of [`RandomBinaryTree`].
pub trait TreeView {
    /// Number of nodes in the tree.
    fn n_nodes(&self) -> usize;

    /// Check if a node is a leaf.
    fn is_leaf(&self, node: NodeId) -> bool;

    /// Child of an internal node that `point` is routed to.
    fn route(&self, node: NodeId, point: &[u8]) -> NodeId;

    /// Row indices held by a leaf.
    fn leaf_rows(&self, node: NodeId) -> &[u32];
}

// ============================================================================
// TreeValidationError
// ============================================================================

/// Structural validation errors for [`RandomBinaryTree`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeValidationError {
    #[error("tree has no nodes")]
    EmptyTree,

    #[error("node {node}: {side} child {child} out of bounds ({n_nodes} nodes)")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },

    #[error("node {node} references itself")]
    SelfLoop { node: NodeId },

    #[error("node {node} reached by more than one path")]
    DuplicateVisit { node: NodeId },

    #[error("cycle detected at node {node}")]
    CycleDetected { node: NodeId },

    #[error("node {node} is unreachable from the root")]
    UnreachableNode { node: NodeId },

    #[error("node {node} reads feature {feature} of {num_features}")]
    FeatureOutOfRange {
        node: NodeId,
        feature: u32,
        num_features: usize,
    },

    #[error("row index holds {got} entries, expected {expected}")]
    RowIndexLength { expected: usize, got: usize },

    #[error("row {row} is not a valid row or appears twice in the row index")]
    NotAPermutation { row: u32 },

    #[error("leaf {node} range {start}..{end} is invalid for {len} entries")]
    LeafRangeOutOfBounds {
        node: NodeId,
        start: u32,
        end: u32,
        len: usize,
    },

    #[error("row index position {position} is covered by {count} leaves")]
    PositionCoverage { position: usize, count: usize },

    #[error("node counts disagree: {internal} internal + {leaves} leaves != {n_nodes} nodes")]
    CountMismatch {
        internal: usize,
        leaves: usize,
        n_nodes: usize,
    },
}

// ============================================================================
// RandomBinaryTree
// ============================================================================

/// One partition tree of a random binary forest.
///
/// `row_index` is a permutation of `0..num_rows`; every leaf owns a contiguous
/// range of it. Node 0 is the root and children are always allocated after
/// their parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomBinaryTree {
    row_index: Box<[u32]>,
    nodes: Box<[Node]>,
    num_internal_nodes: usize,
    num_leaves: usize,
}

impl RandomBinaryTree {
    /// Assemble a tree from a row permutation and a node arena.
    ///
    /// Counts are derived from the arena; call [`validate`](Self::validate) to
    /// check the structure.
    pub fn from_parts(row_index: Vec<u32>, nodes: Vec<Node>) -> Self {
        let num_leaves = nodes.iter().filter(|n| n.is_leaf()).count();
        Self {
            num_internal_nodes: nodes.len() - num_leaves,
            num_leaves,
            row_index: row_index.into_boxed_slice(),
            nodes: nodes.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn num_internal_nodes(&self) -> usize {
        self.num_internal_nodes
    }

    #[inline]
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// Total node count, `num_internal_nodes + num_leaves`.
    #[inline]
    pub fn tree_size(&self) -> usize {
        self.num_internal_nodes + self.num_leaves
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.row_index.len()
    }

    #[inline]
    pub fn row_index(&self) -> &[u32] {
        &self.row_index
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    /// Rule of an internal node.
    pub fn rule(&self, node: NodeId) -> Option<&PartitionRule> {
        match &self.nodes[node as usize] {
            Node::Internal { rule, .. } => Some(rule),
            Node::Leaf { .. } => None,
        }
    }

    /// Leaves as `(node, depth, rows)` in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = (NodeId, u32, &[u32])> + '_ {
        self.nodes.iter().enumerate().filter_map(move |(id, node)| match *node {
            Node::Leaf { start, end, depth } => {
                Some((id as NodeId, depth, &self.row_index[start as usize..end as usize]))
            }
            Node::Internal { .. } => None,
        })
    }

    /// Depth of the deepest leaf.
    pub fn max_depth(&self) -> u32 {
        self.leaves().map(|(_, depth, _)| depth).max().unwrap_or(0)
    }

    /// Descend from the root to the leaf `point` is routed to.
    #[inline]
    pub fn find_leaf(&self, point: &[u8]) -> NodeId {
        crate::query::find_leaf(self, point)
    }

    /// Validate structural invariants.
    ///
    /// Checks that the nodes form a tree rooted at 0, that every rule reads a
    /// feature below `num_features`, that `row_index` is a permutation of
    /// `0..num_rows`, and that leaf ranges cover every position exactly once.
    pub fn validate(&self, num_rows: usize, num_features: usize) -> Result<(), TreeValidationError> {
        let n_nodes = self.nodes.len();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }
        let leaves = self.nodes.iter().filter(|n| n.is_leaf()).count();
        if leaves != self.num_leaves || n_nodes - leaves != self.num_internal_nodes {
            return Err(TreeValidationError::CountMismatch {
                internal: self.num_internal_nodes,
                leaves: self.num_leaves,
                n_nodes,
            });
        }

        self.validate_structure(num_features)?;
        self.validate_rows(num_rows)
    }

    fn validate_structure(&self, num_features: usize) -> Result<(), TreeValidationError> {
        let n_nodes = self.nodes.len();

        // Iterative DFS with color marking.
        // 0 = unvisited, 1 = visiting, 2 = done
        let mut color = vec![0u8; n_nodes];
        let mut stack: Vec<(NodeId, bool)> = vec![(0, false)];

        while let Some((node, finished)) = stack.pop() {
            let idx = node as usize;
            if finished {
                color[idx] = 2;
                continue;
            }
            match color[idx] {
                0 => {}
                1 => return Err(TreeValidationError::CycleDetected { node }),
                _ => return Err(TreeValidationError::DuplicateVisit { node }),
            }
            color[idx] = 1;
            stack.push((node, true));

            if let Node::Internal { rule, first, second } = &self.nodes[idx] {
                for &feature in rule.features() {
                    if feature as usize >= num_features {
                        return Err(TreeValidationError::FeatureOutOfRange {
                            node,
                            feature,
                            num_features,
                        });
                    }
                }
                for (side, child) in [("second", *second), ("first", *first)] {
                    if child == node {
                        return Err(TreeValidationError::SelfLoop { node });
                    }
                    if child as usize >= n_nodes {
                        return Err(TreeValidationError::ChildOutOfBounds {
                            node,
                            side,
                            child,
                            n_nodes,
                        });
                    }
                    stack.push((child, false));
                }
            }
        }

        match color.iter().position(|&c| c == 0) {
            Some(i) => Err(TreeValidationError::UnreachableNode { node: i as NodeId }),
            None => Ok(()),
        }
    }

    fn validate_rows(&self, num_rows: usize) -> Result<(), TreeValidationError> {
        let len = self.row_index.len();
        if len != num_rows {
            return Err(TreeValidationError::RowIndexLength {
                expected: num_rows,
                got: len,
            });
        }

        let mut seen = FixedBitSet::with_capacity(num_rows);
        for &row in self.row_index.iter() {
            if row as usize >= num_rows || seen.put(row as usize) {
                return Err(TreeValidationError::NotAPermutation { row });
            }
        }

        let mut coverage = vec![0usize; len];
        for (id, node) in self.nodes.iter().enumerate() {
            if let Node::Leaf { start, end, .. } = *node {
                if start > end || end as usize > len {
                    return Err(TreeValidationError::LeafRangeOutOfBounds {
                        node: id as NodeId,
                        start,
                        end,
                        len,
                    });
                }
                for slot in &mut coverage[start as usize..end as usize] {
                    *slot += 1;
                }
            }
        }
        match coverage.iter().position(|&count| count != 1) {
            Some(position) => Err(TreeValidationError::PositionCoverage {
                position,
                count: coverage[position],
            }),
            None => Ok(()),
        }
    }
}

impl TreeView for RandomBinaryTree {
    #[inline]
    fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes[node as usize].is_leaf()
    }

    #[inline]
    fn route(&self, node: NodeId, point: &[u8]) -> NodeId {
        match &self.nodes[node as usize] {
            Node::Internal { rule, first, second } => match rule.branch(point) {
                Branch::First => *first,
                Branch::Second => *second,
            },
            Node::Leaf { .. } => node,
        }
    }

    #[inline]
    fn leaf_rows(&self, node: NodeId) -> &[u32] {
        match self.nodes[node as usize].leaf_range() {
            Some(range) => &self.row_index[range],
            None => &[],
        }
    }
}
