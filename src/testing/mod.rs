//! Testing utilities for rbforest.
//!
//! Dataset generators, a small reference forest, and assertions for the
//! structural invariants every trained tree must satisfy. Usable from unit
//! tests, integration tests and benches:
//!
//! ```ignore
//! use rbforest::testing::{assert_forest_invariants, clustered_rows};
//! ```

mod data;

pub use data::{clustered_rows, perturb, random_rows, random_store, ClusteredData};

use crate::config::RbfConfig;
use crate::data::FeatureStore;
use crate::query::QueryEngine;
use crate::repr::{RandomBinaryForest, RandomBinaryTree};
use crate::training::ForestTrainer;

// =============================================================================
// Fixtures
// =============================================================================

/// Row-major data of the two-cluster example: `[[0,0],[0,1],[10,10],[10,11]]`.
pub const TWO_CLUSTER_ROWS: [u8; 8] = [0, 0, 0, 1, 10, 10, 10, 11];

/// Forest over [`TWO_CLUSTER_ROWS`]: 5 trees, depth 3, leaf size 1, both
/// features compared at every node.
pub fn two_cluster_example() -> RandomBinaryForest {
    let store = match FeatureStore::from_row_major(&TWO_CLUSTER_ROWS, 4, 2) {
        Ok(store) => store,
        Err(e) => panic!("two-cluster rows are malformed: {e}"),
    };
    let config = RbfConfig::builder()
        .num_rows(4)
        .num_features(2)
        .num_features_to_compare(2)
        .num_trees(5)
        .tree_depth(3)
        .leaf_size(1)
        .build();
    match config.map(|c| ForestTrainer::new(c).train(store)) {
        Ok(Ok(forest)) => forest,
        Ok(Err(e)) => panic!("two-cluster training failed: {e}"),
        Err(e) => panic!("two-cluster config rejected: {e}"),
    }
}

// =============================================================================
// Invariant assertions
// =============================================================================

/// Assert that no leaf exceeds `leaf_size` unless it sits at `tree_depth` or
/// all of its rows are identical.
///
/// # Panics
///
/// Panics naming the first offending leaf.
pub fn assert_leaf_bound(tree: &RandomBinaryTree, store: &FeatureStore, tree_depth: usize, leaf_size: usize) {
    for (node, depth, rows) in tree.leaves() {
        if rows.len() <= leaf_size || depth as usize == tree_depth {
            continue;
        }
        let first = store.row(rows[0] as usize).to_vec();
        let identical = rows.iter().all(|&r| store.row(r as usize).iter().eq(first.iter().copied()));
        assert!(
            identical,
            "leaf {node} at depth {depth} holds {} rows (leaf_size {leaf_size}, tree_depth {tree_depth})",
            rows.len()
        );
    }
}

/// Validate every tree of `forest` and check the leaf bound.
pub fn assert_forest_invariants(forest: &RandomBinaryForest) {
    if let Err(e) = forest.validate() {
        panic!("forest failed validation: {e}");
    }
    let config = forest.config();
    for tree in forest.trees() {
        assert_eq!(tree.tree_size(), tree.num_internal_nodes() + tree.num_leaves());
        assert_leaf_bound(tree, forest.store(), config.tree_depth, config.leaf_size);
    }
}

/// Fraction of stored rows returned by a dedup query with their own vector.
pub fn self_recall(forest: &RandomBinaryForest) -> f64 {
    let engine = QueryEngine::new(forest);
    let store = forest.store();
    let hits = (0..store.num_rows())
        .filter(|&row| {
            let point = store.row(row).to_vec();
            engine
                .query_dedup(&point)
                .map(|d| d.contains(row as u32))
                .unwrap_or(false)
        })
        .count();
    hits as f64 / store.num_rows() as f64
}
