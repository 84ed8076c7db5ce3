//! rbforest: random binary forests for approximate nearest-candidate search.
//!
//! A forest of randomized binary partition trees over a dataset of byte
//! vectors. Each tree splits rows on thresholds chosen from a random subset of
//! features; a query descends every tree and collects the rows of the leaves
//! it lands in. The union of those rows is a small candidate set that can be
//! reranked by exact distance.
//!
//! # Key Types
//!
//! - [`RbfConfig`] - Forest parameters, built with `RbfConfig::builder()`
//! - [`ForestTrainer`] - Builds a [`RandomBinaryForest`] over a [`FeatureStore`]
//! - [`QueryEngine`] - Single and batch candidate queries
//! - [`api`] - Flat function interface over owned forest handles
//!
//! # Example
//!
//! ```
//! use rbforest::{FeatureStore, ForestTrainer, RbfConfig};
//!
//! let rows = [0u8, 0, 0, 1, 10, 10, 10, 11];
//! let store = FeatureStore::from_row_major(&rows, 4, 2).unwrap();
//! let config = RbfConfig::builder()
//!     .num_rows(4)
//!     .num_features(2)
//!     .num_features_to_compare(2)
//!     .num_trees(5)
//!     .tree_depth(3)
//!     .leaf_size(1)
//!     .build()
//!     .unwrap();
//! let forest = ForestTrainer::new(config).train(store).unwrap();
//!
//! let nearest = forest.query_engine().query_nearest(&[0, 1], Some(1)).unwrap();
//! assert_eq!(nearest[0].row, 1);
//! assert_eq!(rbforest::l2_square_dist(&[0, 0], &[3, 4]).unwrap(), 25);
//! ```

pub mod api;
pub mod config;
pub mod data;
pub mod distance;
pub mod eval;
pub mod query;
pub mod repr;
pub mod testing;
pub mod training;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Configuration
pub use config::{ConfigError, RbfConfig};

// Data
pub use data::{transpose, DataError, FeatureStore};

// Model and training
pub use repr::RandomBinaryForest;
pub use training::{ForestTrainer, SplitStrategy, TrainError, Verbosity};

// Queries
pub use distance::{l2_square_dist, rerank};
pub use query::{DedupResults, ForestResults, Neighbor, QueryEngine, QueryError};

// Shared utilities
pub use training::{run_with_threads, Parallelism};
