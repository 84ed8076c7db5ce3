//! Flat function API over owned forest handles.
//!
//! Mirrors the classic handle-based interface: train a forest from a
//! column-major byte buffer, then query it by reference. The handle is the
//! owned [`RandomBinaryForest`]; dropping it releases the forest.
//!
//! # Example
//!
//! ```
//! use rbforest::{api, RbfConfig};
//!
//! let row_major = [0u8, 0, 0, 1, 10, 10, 10, 11];
//! let col_major = api::transpose(&row_major, 4, 2)?;
//! let config = RbfConfig::builder()
//!     .num_rows(4)
//!     .num_features(2)
//!     .num_features_to_compare(2)
//!     .num_trees(5)
//!     .tree_depth(3)
//!     .leaf_size(1)
//!     .build()?;
//! let forest = api::train_forest(col_major, config)?;
//!
//! let sorted = api::query_forest_dedup_results_sorted(&forest, &[10, 10], Some(1))?;
//! assert_eq!(sorted[0].row, 2);
//! # Ok::<(), api::Error>(())
//! ```

use crate::config::{ConfigError, RbfConfig};
use crate::data::{DataError, FeatureStore};
use crate::query::{DedupResults, ForestResults, Neighbor, QueryError};
use crate::repr::RandomBinaryForest;
use crate::training::{ForestTrainer, TrainError};

/// Any error the flat API can return.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Train(#[from] TrainError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Row-major `num_rows x num_features` bytes to column-major.
pub fn transpose(row_major: &[u8], num_rows: usize, num_features: usize) -> Result<Vec<u8>> {
    Ok(crate::data::transpose(row_major, num_rows, num_features)?)
}

/// Train a forest over a column-major buffer of `config.num_rows x config.num_features`.
pub fn train_forest(column_major: Vec<u8>, config: RbfConfig) -> Result<RandomBinaryForest> {
    let store = FeatureStore::from_col_major(column_major, config.num_rows, config.num_features)?;
    Ok(ForestTrainer::new(config).train(store)?)
}

pub fn query_forest_all_results(forest: &RandomBinaryForest, query: &[u8]) -> Result<ForestResults> {
    Ok(forest.query_engine().query_all(query)?)
}

/// `queries` is row-major, `num_queries x num_features`.
pub fn batch_query_forest_all_results(
    forest: &RandomBinaryForest,
    queries: &[u8],
    num_queries: usize,
) -> Result<Vec<ForestResults>> {
    Ok(forest.query_engine().batch_query_all(queries, num_queries)?)
}

pub fn query_forest_dedup_results(forest: &RandomBinaryForest, query: &[u8]) -> Result<DedupResults> {
    Ok(forest.query_engine().query_dedup(query)?)
}

pub fn batch_query_forest_dedup_results(
    forest: &RandomBinaryForest,
    queries: &[u8],
    num_queries: usize,
) -> Result<Vec<DedupResults>> {
    Ok(forest.query_engine().batch_query_dedup(queries, num_queries)?)
}

/// Deduplicated candidates sorted by exact distance, keeping at most `k`.
///
/// The order is fixed to squared L2 ([`l2_square_dist`]), ties by row index.
pub fn query_forest_dedup_results_sorted(
    forest: &RandomBinaryForest,
    query: &[u8],
    k: Option<usize>,
) -> Result<Vec<Neighbor>> {
    Ok(forest.query_engine().query_nearest(query, k)?)
}

/// [`query_forest_dedup_results_sorted`] for each row of a row-major batch.
pub fn batch_query_forest_dedup_results_sorted(
    forest: &RandomBinaryForest,
    queries: &[u8],
    num_queries: usize,
    k: Option<usize>,
) -> Result<Vec<Vec<Neighbor>>> {
    Ok(forest.query_engine().batch_query_nearest(queries, num_queries, k)?)
}

pub fn l2_square_dist(a: &[u8], b: &[u8]) -> Result<u64> {
    Ok(crate::distance::l2_square_dist(a, b)?)
}
