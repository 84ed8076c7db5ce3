//! Root-to-leaf descent.

use crate::repr::{NodeId, TreeView};

/// Descend from the root to the leaf `point` is routed to.
///
/// Evaluates the same rules that partitioned the rows during construction.
#[inline]
pub fn find_leaf<T: TreeView + ?Sized>(tree: &T, point: &[u8]) -> NodeId {
    let mut node: NodeId = 0;
    while !tree.is_leaf(node) {
        node = tree.route(node, point);
    }
    node
}

/// Rows of the leaf `point` lands in.
#[inline]
pub fn leaf_rows_for<'t, T: TreeView + ?Sized>(tree: &'t T, point: &[u8]) -> &'t [u32] {
    tree.leaf_rows(find_leaf(tree, point))
}
