//! Canonical representation of a trained forest.
//!
//! Trees are flat node arenas addressed by [`NodeId`]; children always follow
//! their parent, so the structure is acyclic by construction.

/// Index of a node in its tree's arena. The root is node 0.
pub type NodeId = u32;

pub mod forest;
pub mod node;
pub mod rule;
pub mod tree;

pub use forest::{ForestValidationError, ForestView, RandomBinaryForest};
pub use node::Node;
pub use rule::{Branch, PartitionRule};
pub use tree::{RandomBinaryTree, TreeValidationError, TreeView};
