//! Trained forest: trees plus the feature store they index.

use std::sync::Arc;

use super::tree::{RandomBinaryTree, TreeValidationError, TreeView};
use crate::config::RbfConfig;
use crate::data::FeatureStore;

/// Read access to a forest, as needed by the query engine.
pub trait ForestView: Sync {
    type Tree: TreeView + Sync;

    fn n_trees(&self) -> usize;

    /// Width of every indexed vector.
    fn num_features(&self) -> usize;

    fn tree(&self, idx: usize) -> &Self::Tree;

    /// Dataset the trees index, used for exact reranking.
    fn reference(&self) -> &FeatureStore;
}

/// Structural validation errors for [`RandomBinaryForest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForestValidationError {
    #[error("forest holds {got} trees, config asks for {expected}")]
    TreeCountMismatch { expected: usize, got: usize },

    #[error("store is {rows}x{features}, config expects {expected_rows}x{expected_features}")]
    StoreShapeMismatch {
        rows: usize,
        features: usize,
        expected_rows: usize,
        expected_features: usize,
    },

    #[error("tree {tree} is invalid: {source}")]
    InvalidTree {
        tree: usize,
        #[source]
        source: TreeValidationError,
    },
}

/// An ensemble of random binary trees over one shared dataset.
///
/// Immutable once trained; queries take `&self` and the forest is `Send + Sync`.
/// Dropping the forest releases its trees and its handle on the store.
#[derive(Debug, Clone)]
pub struct RandomBinaryForest {
    config: RbfConfig,
    trees: Vec<RandomBinaryTree>,
    store: Arc<FeatureStore>,
}

impl RandomBinaryForest {
    pub(crate) fn new(config: RbfConfig, trees: Vec<RandomBinaryTree>, store: Arc<FeatureStore>) -> Self {
        Self { config, trees, store }
    }

    #[inline]
    pub fn config(&self) -> &RbfConfig {
        &self.config
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    pub fn tree(&self, idx: usize) -> &RandomBinaryTree {
        &self.trees[idx]
    }

    pub fn trees(&self) -> impl Iterator<Item = &RandomBinaryTree> {
        self.trees.iter()
    }

    #[inline]
    pub fn store(&self) -> &Arc<FeatureStore> {
        &self.store
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.store.num_rows()
    }

    #[inline]
    pub fn num_features(&self) -> usize {
        self.store.num_features()
    }

    /// Sum of `tree_size` over all trees.
    pub fn total_nodes(&self) -> usize {
        self.trees.iter().map(RandomBinaryTree::tree_size).sum()
    }

    /// Validate every tree against the store shape.
    pub fn validate(&self) -> Result<(), ForestValidationError> {
        if self.trees.len() != self.config.num_trees {
            return Err(ForestValidationError::TreeCountMismatch {
                expected: self.config.num_trees,
                got: self.trees.len(),
            });
        }
        let (rows, features) = (self.num_rows(), self.num_features());
        if rows != self.config.num_rows || features != self.config.num_features {
            return Err(ForestValidationError::StoreShapeMismatch {
                rows,
                features,
                expected_rows: self.config.num_rows,
                expected_features: self.config.num_features,
            });
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(rows, features)
                .map_err(|source| ForestValidationError::InvalidTree { tree: idx, source })?;
        }
        Ok(())
    }
}

impl ForestView for RandomBinaryForest {
    type Tree = RandomBinaryTree;

    #[inline]
    fn n_trees(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    fn num_features(&self) -> usize {
        self.store.num_features()
    }

    #[inline]
    fn tree(&self, idx: usize) -> &RandomBinaryTree {
        &self.trees[idx]
    }

    #[inline]
    fn reference(&self) -> &FeatureStore {
        &self.store
    }
}
